//! Cross-validator (C11): SHA-256 coherence across the builder receipt,
//! DWARF oracle, alignment, and Ghidra sides.
//!
//! Same-variant mode requires the DWARF report, alignment output, and
//! Ghidra report to all carry the same binary SHA-256 as the build context.
//! Cross-variant mode additionally permits the Ghidra side to carry a
//! second, explicitly supplied artifact SHA that also appears in the
//! receipt (`build_context::ghidra_binary_sha256`).

use crate::build_context::BuildContext;
use crate::error::{GhidraJoinError, GhidraJoinErrorKind};

/// Validates SHA-256 coherence across all join sources. Any mismatch is a
/// tier-1 hard error listing every mismatched pair, per `spec.md` §7.
pub fn cross_validate_sha256(
    ctx: &BuildContext,
    dwarf_report_sha256: &str,
    alignment_binary_sha256: &str,
    ghidra_report_sha256: &str,
) -> Result<(), GhidraJoinError> {
    let expected_ghidra_sha = ctx.ghidra_binary_sha256.as_deref().unwrap_or(&ctx.binary_sha256);

    let mut mismatches = Vec::new();
    if dwarf_report_sha256 != ctx.binary_sha256 {
        mismatches.push(format!(
            "dwarf report sha256 {dwarf_report_sha256} != build context sha256 {}",
            ctx.binary_sha256
        ));
    }
    if alignment_binary_sha256 != ctx.binary_sha256 {
        mismatches.push(format!(
            "alignment binary sha256 {alignment_binary_sha256} != build context sha256 {}",
            ctx.binary_sha256
        ));
    }
    if ghidra_report_sha256 != expected_ghidra_sha {
        mismatches.push(format!(
            "ghidra report sha256 {ghidra_report_sha256} != expected sha256 {expected_ghidra_sha}"
        ));
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(GhidraJoinError::new(GhidraJoinErrorKind::ShaMismatch, mismatches.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(ghidra_sha: Option<&str>) -> BuildContext {
        BuildContext {
            binary_sha256: "AAA".into(),
            job_id: "job".into(),
            test_case: "case".into(),
            opt: "O0".into(),
            variant: "debug".into(),
            builder_profile_id: "p".into(),
            ghidra_binary_sha256: ghidra_sha.map(str::to_string),
            ghidra_variant: ghidra_sha.map(|_| "stripped".to_string()),
        }
    }

    #[test]
    fn same_variant_requires_all_matching_shas() {
        assert!(cross_validate_sha256(&ctx(None), "AAA", "AAA", "AAA").is_ok());
        assert!(cross_validate_sha256(&ctx(None), "AAA", "AAA", "BBB").is_err());
    }

    #[test]
    fn cross_variant_allows_second_ghidra_sha() {
        assert!(cross_validate_sha256(&ctx(Some("BBB")), "AAA", "AAA", "BBB").is_ok());
        assert!(cross_validate_sha256(&ctx(Some("BBB")), "AAA", "AAA", "AAA").is_err());
    }

    #[test]
    fn reports_all_mismatches_together() {
        let err = cross_validate_sha256(&ctx(None), "XXX", "YYY", "ZZZ").unwrap_err();
        assert_eq!(err.kind(), crate::error::GhidraJoinErrorKind::ShaMismatch);
    }
}
