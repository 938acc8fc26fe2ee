//! Binary- and function-level policy gates (C4): profiles and verdicts.

pub mod profile;
pub mod verdict;

pub use profile::DwarfProfile;
pub use verdict::{gate_binary, judge_function, Verdict};
