//! Shared primitives used by every crate in the alignment substrate:
//! content hashing, deterministic JSON/JSONL rendering, a small mmap-backed
//! byte buffer, and generic error scaffolding.

pub mod byteview;
pub mod error;
pub mod hash;
pub mod json;

pub use byteview::ByteData;
pub use error::WrappedError;
