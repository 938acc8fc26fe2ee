//! Candidate scorer (C9): scores every syntactic function's overlap against
//! a DWARF function's line evidence, then selects a best match.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use oracle_ts::schema::TsFunctionRecord;

use crate::origin_map::OriginMap;
use crate::policy::profile::JoinProfile;
use crate::policy::verdict::JoinVerdict;

/// A candidate syntactic function scored against one DWARF function's
/// line-evidence multiset.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    pub tu_path: String,
    pub ts_func_id: String,
    pub context_hash: String,
    pub overlap_count: u64,
    pub total_count: u64,
    pub overlap_ratio: f64,
    pub gap_count: u64,
    pub span_size: usize,
    pub start_byte: usize,
}

fn round6(x: f64) -> f64 {
    (x * 1_000_000.0).round() / 1_000_000.0
}

/// Scores every join-target TS function across all TUs against one DWARF
/// function's evidence multiset. Only functions with `overlap_count > 0`
/// are returned as candidates.
pub fn score_candidates(
    evidence: &BTreeMap<(String, u64), u64>,
    total_count: u64,
    ts_functions: &[TsFunctionRecord],
    origin_maps: &BTreeMap<String, OriginMap>,
) -> Vec<CandidateResult> {
    let mut out = Vec::new();

    for func in ts_functions {
        if func.verdict == "REJECT" {
            continue;
        }
        let Some(origin_map) = origin_maps.get(&func.tu_path) else {
            continue;
        };

        let mut overlap_count: u64 = 0;
        for line in func.start_line..=func.end_line {
            if let Some((path, orig_line)) = origin_map.query_forward(line as usize) {
                if let Some(count) = evidence.get(&(path.clone(), *orig_line as u64)) {
                    overlap_count += count;
                }
            }
        }

        if overlap_count == 0 {
            continue;
        }

        let overlap_ratio = if total_count == 0 {
            0.0
        } else {
            round6(overlap_count as f64 / total_count as f64)
        };
        let gap_count = total_count.saturating_sub(overlap_count);

        out.push(CandidateResult {
            tu_path: func.tu_path.clone(),
            ts_func_id: func.ts_func_id.clone(),
            context_hash: func.context_hash.clone(),
            overlap_count,
            total_count,
            overlap_ratio,
            gap_count,
            span_size: func.end_byte - func.start_byte,
            start_byte: func.start_byte,
        });
    }

    out
}

/// Tie-break ordering: `(-overlap_ratio, -overlap_count, span_size,
/// tu_path, start_byte)` ascending — smaller spans win ties.
fn tie_break_cmp(a: &CandidateResult, b: &CandidateResult) -> Ordering {
    b.overlap_ratio
        .partial_cmp(&a.overlap_ratio)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.overlap_count.cmp(&a.overlap_count))
        .then_with(|| a.span_size.cmp(&b.span_size))
        .then_with(|| a.tu_path.cmp(&b.tu_path))
        .then_with(|| a.start_byte.cmp(&b.start_byte))
}

/// True if any near-tie shares the best's `context_hash` but comes from a
/// different `tu_path` — duplicate header content parsed in multiple TUs.
pub fn detect_header_replication(best: &CandidateResult, near_ties: &[CandidateResult]) -> bool {
    near_ties
        .iter()
        .any(|c| c.context_hash == best.context_hash && c.tu_path != best.tu_path)
}

/// Selects a best candidate from a scored list and computes the verdict.
/// Returns `(verdict, best, reasons, near_ties)`.
pub fn select_best(
    mut candidates: Vec<CandidateResult>,
    profile: &JoinProfile,
) -> (JoinVerdict, Option<CandidateResult>, Vec<&'static str>, Vec<CandidateResult>) {
    if candidates.is_empty() {
        return (JoinVerdict::NoMatch, None, vec!["NO_CANDIDATES"], Vec::new());
    }

    candidates.sort_by(tie_break_cmp);
    let best = candidates.remove(0);

    if best.overlap_count < profile.min_overlap_lines {
        return (JoinVerdict::NoMatch, Some(best), vec!["NO_CANDIDATES"], Vec::new());
    }

    let near_ties: Vec<CandidateResult> = candidates
        .into_iter()
        .filter(|c| (c.overlap_ratio - best.overlap_ratio).abs() <= profile.epsilon)
        .collect();

    let mut reasons = Vec::new();
    let verdict = if best.overlap_ratio < profile.overlap_threshold {
        reasons.push("LOW_OVERLAP_RATIO");
        JoinVerdict::NoMatch
    } else if !near_ties.is_empty() {
        reasons.push("NEAR_TIE");
        if detect_header_replication(&best, &near_ties) {
            reasons.push("HEADER_REPLICATION_COLLISION");
        }
        JoinVerdict::Ambiguous
    } else {
        reasons.push("UNIQUE_BEST");
        JoinVerdict::Match
    };

    if best.gap_count > 0 {
        reasons.push("PC_LINE_GAP");
    }

    (verdict, Some(best), reasons, near_ties)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(tu: &str, ratio: f64, count: u64, total: u64, span: usize, hash: &str) -> CandidateResult {
        CandidateResult {
            tu_path: tu.to_string(),
            ts_func_id: format!("{tu}:f"),
            context_hash: hash.to_string(),
            overlap_count: count,
            total_count: total,
            overlap_ratio: ratio,
            gap_count: total.saturating_sub(count),
            span_size: span,
            start_byte: 0,
        }
    }

    #[test]
    fn full_overlap_is_unique_match() {
        let c = candidate("a.i", 1.0, 10, 10, 50, "h1");
        let (verdict, best, reasons, _) = select_best(vec![c], &JoinProfile::v0());
        assert_eq!(verdict, JoinVerdict::Match);
        assert!(best.is_some());
        assert_eq!(reasons, vec!["UNIQUE_BEST"]);
    }

    #[test]
    fn no_candidates_is_no_match() {
        let (verdict, best, reasons, _) = select_best(vec![], &JoinProfile::v0());
        assert_eq!(verdict, JoinVerdict::NoMatch);
        assert!(best.is_none());
        assert_eq!(reasons, vec!["NO_CANDIDATES"]);
    }

    #[test]
    fn low_overlap_ratio_is_no_match() {
        let c = candidate("a.i", 0.5, 5, 10, 50, "h1");
        let (verdict, _, reasons, _) = select_best(vec![c], &JoinProfile::v0());
        assert_eq!(verdict, JoinVerdict::NoMatch);
        assert!(reasons.contains(&"LOW_OVERLAP_RATIO"));
    }

    #[test]
    fn near_ties_from_same_hash_different_tu_are_header_replication() {
        let best = candidate("a.i", 1.0, 10, 10, 50, "shared");
        let tie = candidate("b.i", 0.99, 9, 10, 50, "shared");
        let (verdict, _, reasons, _) = select_best(vec![best, tie], &JoinProfile::v0());
        assert_eq!(verdict, JoinVerdict::Ambiguous);
        assert!(reasons.contains(&"NEAR_TIE"));
        assert!(reasons.contains(&"HEADER_REPLICATION_COLLISION"));
    }

    #[test]
    fn gap_count_attaches_pc_line_gap() {
        let c = candidate("a.i", 0.9, 9, 10, 50, "h1");
        let (_, _, reasons, _) = select_best(vec![c], &JoinProfile::v0());
        assert!(reasons.contains(&"PC_LINE_GAP"));
    }

    #[test]
    fn smaller_span_wins_exact_ties() {
        let wide = candidate("a.i", 1.0, 10, 10, 100, "h1");
        let tight = candidate("a.i", 1.0, 10, 10, 20, "h1");
        let (_, best, _, _) = select_best(vec![wide, tight], &JoinProfile::v0());
        assert_eq!(best.unwrap().span_size, 20);
    }
}
