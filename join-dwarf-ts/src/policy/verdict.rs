//! Alignment verdict (C9). Reason strings are the closed taxonomy from
//! `spec.md` §4.9 and §8; see `candidate::select_best` for where each fires.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinVerdict {
    #[serde(rename = "MATCH")]
    Match,
    #[serde(rename = "AMBIGUOUS")]
    Ambiguous,
    #[serde(rename = "NO_MATCH")]
    NoMatch,
}

impl JoinVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinVerdict::Match => "MATCH",
            JoinVerdict::Ambiguous => "AMBIGUOUS",
            JoinVerdict::NoMatch => "NO_MATCH",
        }
    }
}
