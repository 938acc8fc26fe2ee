//! Oracle-ts: the syntactic cross-check extractor (C5-C7).
//!
//! Parses preprocessed C translation units with tree-sitter, enumerates
//! function definitions and their structural (control-flow) nodes, gates
//! each against a frozen policy profile, and emits deterministic extraction
//! recipes for the join stage downstream.

pub mod error;
pub mod function_index;
pub mod node_index;
pub mod normalizer;
pub mod policy;
pub mod runner;
pub mod schema;
pub mod ts_parser;
pub mod writer;

pub use error::{OracleTsError, OracleTsErrorKind};
pub use runner::run_oracle_ts;
pub use schema::SCHEMA_VERSION;
