//! Frozen policy knobs for the address join (C10).

use serde::{Deserialize, Serialize};

use align_common::hash::sha256_bytes;
use align_common::json::to_json_string;

/// Compiler-emitted bookkeeping functions excluded from DWARF-side
/// eligibility, per `spec.md` §4.10.
pub const DEFAULT_AUX_NAMES: &[&str] = &["_start", "frame_dummy", "register_tm_clones", "deregister_tm_clones", "__libc_csu_init", "__libc_csu_fini"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinGhidraProfile {
    pub aux_names: Vec<String>,
}

impl JoinGhidraProfile {
    pub fn v0() -> Self {
        JoinGhidraProfile {
            aux_names: DEFAULT_AUX_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn profile_id(&self) -> String {
        let rendered = to_json_string(self).expect("JoinGhidraProfile always serializes");
        sha256_bytes(rendered.as_bytes())
    }

    pub fn is_aux_name(&self, name: &str) -> bool {
        self.aux_names.iter().any(|n| n == name)
    }
}

impl Default for JoinGhidraProfile {
    fn default() -> Self {
        Self::v0()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_id_is_stable() {
        assert_eq!(JoinGhidraProfile::v0().profile_id(), JoinGhidraProfile::v0().profile_id());
    }

    #[test]
    fn recognizes_default_aux_names() {
        assert!(JoinGhidraProfile::v0().is_aux_name("_start"));
        assert!(!JoinGhidraProfile::v0().is_aux_name("add"));
    }
}
