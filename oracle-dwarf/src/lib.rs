//! Oracle-DWARF: the source-of-truth extractor (C1-C4).
//!
//! Parses an ELF binary's DWARF debug information to enumerate functions,
//! gates binaries and functions against a frozen policy profile, and emits a
//! per-function line-evidence multiset for the join stages downstream.

pub mod dwarf;
pub mod elf;
pub mod error;
pub mod line_mapper;
pub mod policy;
pub mod runner;
pub mod schema;
pub mod writer;

pub use error::{OracleDwarfError, OracleDwarfErrorKind};
pub use runner::run_oracle_dwarf;
pub use schema::SCHEMA_VERSION;
