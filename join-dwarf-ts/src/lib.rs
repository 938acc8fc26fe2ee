//! Join-DWARF↔TS: the line-evidence join (C8-C9).
//!
//! For each DWARF join-target function, builds a forward origin map from
//! every `.i` file's `#line` directives, scores every syntactic function's
//! overlap against the DWARF function's line-evidence multiset, and selects
//! a best candidate with tie-break, ambiguity, and header-replication
//! semantics.

pub mod candidate;
pub mod error;
pub mod loader;
pub mod origin_map;
pub mod policy;
pub mod runner;
pub mod schema;
pub mod writer;

pub use error::{JoinError, JoinErrorKind};
pub use runner::{run_join, run_join_from_paths};
pub use schema::SCHEMA_VERSION;
