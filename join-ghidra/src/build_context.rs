//! Build receipt model and build-context resolution (part of C11).
//!
//! The builder is an external collaborator (`spec.md` §1): it delivers a
//! `BuildReceipt` associating each artifact's SHA-256 with an optimization
//! level and variant. Resolving a `BuildContext` is the first step of
//! cross-validation, since same-variant vs. cross-variant mode depends on
//! whether a second, explicit Ghidra artifact SHA is supplied.

use serde::{Deserialize, Serialize};

use crate::error::{GhidraJoinError, GhidraJoinErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildArtifact {
    pub sha256: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildEntry {
    pub optimization: String,
    pub variant: String,
    pub status: String,
    pub artifact: Option<BuildArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobInfo {
    pub job_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuilderInfo {
    pub profile_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildReceipt {
    pub job: JobInfo,
    pub builder: BuilderInfo,
    pub builds: Vec<BuildEntry>,
}

/// Finds the build entry whose artifact SHA-256 matches `sha256`, if any.
pub fn resolve_target_build_entry<'a>(
    receipt: &'a BuildReceipt,
    sha256: &str,
) -> Option<&'a BuildEntry> {
    receipt
        .builds
        .iter()
        .find(|entry| entry.artifact.as_ref().map(|a| a.sha256.as_str()) == Some(sha256))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildContext {
    pub binary_sha256: String,
    pub job_id: String,
    pub test_case: String,
    pub opt: String,
    pub variant: String,
    pub builder_profile_id: String,
    pub ghidra_binary_sha256: Option<String>,
    pub ghidra_variant: Option<String>,
}

/// Resolves the `BuildContext` for a join run. `ghidra_binary_sha256` is
/// `Some` for a cross-variant join (Ghidra analyzed a different artifact
/// than the DWARF oracle); both artifacts must appear in the same receipt.
pub fn resolve_build_context(
    receipt: &BuildReceipt,
    binary_sha256: &str,
    ghidra_binary_sha256: Option<&str>,
) -> Result<BuildContext, GhidraJoinError> {
    let entry = resolve_target_build_entry(receipt, binary_sha256)
        .ok_or_else(|| GhidraJoinError::bare(GhidraJoinErrorKind::ArtifactNotInReceipt))?;

    let ghidra_variant = match ghidra_binary_sha256 {
        Some(sha) => {
            let ghidra_entry = resolve_target_build_entry(receipt, sha)
                .ok_or_else(|| GhidraJoinError::bare(GhidraJoinErrorKind::ArtifactNotInReceipt))?;
            Some(ghidra_entry.variant.clone())
        }
        None => None,
    };

    Ok(BuildContext {
        binary_sha256: binary_sha256.to_string(),
        job_id: receipt.job.job_id.clone(),
        test_case: receipt.job.name.clone(),
        opt: entry.optimization.clone(),
        variant: entry.variant.clone(),
        builder_profile_id: receipt.builder.profile_id.clone(),
        ghidra_binary_sha256: ghidra_binary_sha256.map(str::to_string),
        ghidra_variant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> BuildReceipt {
        BuildReceipt {
            job: JobInfo { job_id: "job-1".into(), name: "add".into() },
            builder: BuilderInfo { profile_id: "builder-v0".into() },
            builds: vec![
                BuildEntry {
                    optimization: "O0".into(),
                    variant: "debug".into(),
                    status: "success".into(),
                    artifact: Some(BuildArtifact { sha256: "AAA".into(), path: "a.debug".into() }),
                },
                BuildEntry {
                    optimization: "O0".into(),
                    variant: "stripped".into(),
                    status: "success".into(),
                    artifact: Some(BuildArtifact { sha256: "BBB".into(), path: "a.stripped".into() }),
                },
            ],
        }
    }

    #[test]
    fn same_variant_context_has_no_ghidra_override() {
        let ctx = resolve_build_context(&receipt(), "AAA", None).unwrap();
        assert_eq!(ctx.variant, "debug");
        assert!(ctx.ghidra_binary_sha256.is_none());
    }

    #[test]
    fn cross_variant_context_resolves_both_artifacts() {
        let ctx = resolve_build_context(&receipt(), "AAA", Some("BBB")).unwrap();
        assert_eq!(ctx.variant, "debug");
        assert_eq!(ctx.ghidra_variant.as_deref(), Some("stripped"));
    }

    #[test]
    fn missing_artifact_is_an_error() {
        assert!(resolve_build_context(&receipt(), "ZZZ", None).is_err());
    }
}
