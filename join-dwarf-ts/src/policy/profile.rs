//! Frozen scoring knobs for the line-evidence join (C9).

use serde::{Deserialize, Serialize};

use align_common::hash::sha256_bytes;
use align_common::json::to_json_string;

pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] =
    &["/usr/include", "/usr/lib/gcc", "<built-in>", "<command-line>"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinProfile {
    /// Minimum `overlap_ratio` for a best candidate to be eligible for MATCH.
    pub overlap_threshold: f64,
    /// Maximum `overlap_ratio` distance from the best for a near-tie.
    pub epsilon: f64,
    /// Minimum `overlap_count` for a best candidate to be considered at all.
    pub min_overlap_lines: u64,
    pub excluded_path_prefixes: Vec<String>,
}

impl JoinProfile {
    /// The baseline profile, matching the defaults documented in `spec.md` §4.9.
    pub fn v0() -> Self {
        JoinProfile {
            overlap_threshold: 0.7,
            epsilon: 0.02,
            min_overlap_lines: 1,
            excluded_path_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn profile_id(&self) -> String {
        let rendered = to_json_string(self).expect("JoinProfile always serializes");
        sha256_bytes(rendered.as_bytes())
    }
}

impl Default for JoinProfile {
    fn default() -> Self {
        Self::v0()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_id_is_stable_for_equal_profiles() {
        assert_eq!(JoinProfile::v0().profile_id(), JoinProfile::v0().profile_id());
    }

    #[test]
    fn profile_id_changes_with_thresholds() {
        let mut other = JoinProfile::v0();
        other.epsilon += 0.01;
        assert_ne!(JoinProfile::v0().profile_id(), other.profile_id());
    }
}
