//! Frozen policy knobs for the oracle-ts stage (C7).

use serde::{Deserialize, Serialize};

use align_common::hash::sha256_bytes;
use align_common::json::to_json_string;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TsProfile {
    pub parser_name: String,
    pub deep_nesting_threshold: u32,
}

impl TsProfile {
    /// The single supported profile for oracle-ts v0.
    pub fn v0() -> Self {
        TsProfile {
            parser_name: "tree-sitter-c".to_string(),
            deep_nesting_threshold: 8,
        }
    }

    pub fn profile_id(&self) -> String {
        let rendered = to_json_string(self).expect("TsProfile always serializes");
        sha256_bytes(rendered.as_bytes())
    }
}

impl Default for TsProfile {
    fn default() -> Self {
        Self::v0()
    }
}
