//! Typed output records for the line-evidence join stage (C9, C12-C13 local
//! half): `alignment_pairs.json` and `alignment_report.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateResult;
use crate::policy::JoinVerdict;

pub const SCHEMA_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateScoreModel {
    pub tu_path: String,
    pub ts_func_id: String,
    pub context_hash: String,
    pub overlap_count: u64,
    pub total_count: u64,
    pub overlap_ratio: f64,
    pub gap_count: u64,
}

impl From<&CandidateResult> for CandidateScoreModel {
    fn from(c: &CandidateResult) -> Self {
        CandidateScoreModel {
            tu_path: c.tu_path.clone(),
            ts_func_id: c.ts_func_id.clone(),
            context_hash: c.context_hash.clone(),
            overlap_count: c.overlap_count,
            total_count: c.total_count,
            overlap_ratio: c.overlap_ratio,
            gap_count: c.gap_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignmentPair {
    pub dwarf_function_id: String,
    pub ts_func_id: Option<String>,
    pub overlap_count: u64,
    pub total_count: u64,
    pub overlap_ratio: f64,
    pub gap_count: u64,
    pub verdict: String,
    pub reasons: Vec<String>,
    /// Every scored candidate, for auditability — not just the winner.
    pub candidates: Vec<CandidateScoreModel>,
}

impl AlignmentPair {
    pub fn build(
        dwarf_function_id: &str,
        total_count: u64,
        verdict: JoinVerdict,
        reasons: &[&'static str],
        best: Option<&CandidateResult>,
        all_candidates: &[CandidateResult],
    ) -> Self {
        let mut candidates: Vec<CandidateScoreModel> =
            all_candidates.iter().map(CandidateScoreModel::from).collect();
        candidates.sort_by(|a, b| a.ts_func_id.cmp(&b.ts_func_id));

        AlignmentPair {
            dwarf_function_id: dwarf_function_id.to_string(),
            ts_func_id: best.map(|c| c.ts_func_id.clone()),
            overlap_count: best.map(|c| c.overlap_count).unwrap_or(0),
            total_count,
            overlap_ratio: best.map(|c| c.overlap_ratio).unwrap_or(0.0),
            gap_count: best.map(|c| c.gap_count).unwrap_or(total_count),
            verdict: verdict.as_str().to_string(),
            reasons: reasons.iter().map(|s| s.to_string()).collect(),
            candidates,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NonTargetEntry {
    pub dwarf_function_id: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PairCounts {
    #[serde(rename = "match")]
    pub match_count: u64,
    pub ambiguous: u64,
    pub no_match: u64,
    pub non_target: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignmentPairsOutput {
    pub schema_version: String,
    pub binary_sha256: String,
    pub dwarf_profile_id: String,
    pub ts_profile_id: String,
    pub join_profile_id: String,
    pub pairs: Vec<AlignmentPair>,
    pub non_targets: Vec<NonTargetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignmentReport {
    pub schema_version: String,
    pub tu_hashes: BTreeMap<String, String>,
    pub pair_counts: PairCounts,
    pub reason_counts: BTreeMap<String, u64>,
    pub overlap_threshold: f64,
    pub epsilon: f64,
    pub min_overlap_lines: u64,
    pub excluded_path_prefixes: Vec<String>,
    /// Seconds since the Unix epoch; the sole non-deterministic field.
    pub timestamp: String,
}
