//! Address join (C10-C13): joins the DWARF+tree-sitter alignment onto
//! Ghidra's decompiled function table by virtual address.

pub mod address_join;
pub mod build_context;
pub mod cross_validate;
pub mod diagnostics;
pub mod error;
pub mod function_table;
pub mod loader;
pub mod policy;
pub mod runner;
pub mod schema;
pub mod writer;

pub use error::{GhidraJoinError, GhidraJoinErrorKind};
pub use runner::{load_inputs, run_join_oracles_ghidra, JoinGhidraInputs};
pub use schema::SCHEMA_VERSION;
