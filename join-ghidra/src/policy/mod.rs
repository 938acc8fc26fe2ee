//! Frozen policy for the address join (C10): aux-function exclusion list.

pub mod profile;

pub use profile::JoinGhidraProfile;
