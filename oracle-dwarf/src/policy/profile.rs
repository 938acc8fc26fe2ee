//! Frozen policy knobs for the oracle-dwarf stage (C4).
//!
//! A `DwarfProfile` is content-addressed: its `profile_id` is the SHA-256 of
//! its own canonical JSON rendering, so any change to a threshold produces a
//! new, distinguishable identity that downstream reports can pin against.

use serde::{Deserialize, Serialize};

use align_common::hash::sha256_bytes;
use align_common::json::to_json_string;

/// Path prefixes excluded from "dominant file" consideration when deciding
/// `SYSTEM_HEADER_DOMINANT`.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["/usr/include", "/usr/lib/gcc"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DwarfProfile {
    /// Below this ratio, a function's dominant file no longer "owns" enough
    /// of its line evidence and the function is flagged `MULTI_FILE_RANGE`.
    pub multi_file_ratio_threshold: f64,
    /// A function whose address ranges fragment into more than this many
    /// segments is flagged `RANGES_FRAGMENTED`.
    pub max_fragments_warn: usize,
    /// Path prefixes treated as system headers for `SYSTEM_HEADER_DOMINANT`.
    pub excluded_path_prefixes: Vec<String>,
}

impl DwarfProfile {
    /// The baseline profile, matching the defaults documented in `spec.md` §4.4.
    pub fn v0() -> Self {
        DwarfProfile {
            multi_file_ratio_threshold: 0.9,
            max_fragments_warn: 8,
            excluded_path_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Content-addressed identity: SHA-256 of this profile's sorted JSON.
    pub fn profile_id(&self) -> String {
        let rendered = to_json_string(self).expect("DwarfProfile always serializes");
        sha256_bytes(rendered.as_bytes())
    }

    pub fn is_system_header(&self, path: &str) -> bool {
        self.excluded_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

impl Default for DwarfProfile {
    fn default() -> Self {
        Self::v0()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_id_is_stable_for_equal_profiles() {
        assert_eq!(DwarfProfile::v0().profile_id(), DwarfProfile::v0().profile_id());
    }

    #[test]
    fn profile_id_changes_with_thresholds() {
        let mut other = DwarfProfile::v0();
        other.max_fragments_warn += 1;
        assert_ne!(DwarfProfile::v0().profile_id(), other.profile_id());
    }
}
