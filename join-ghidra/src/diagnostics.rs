//! Diagnostics & reports (C12, address-join half): yield classification and
//! the invariant checks `spec.md` §8 requires of every produced artifact.

use crate::schema::JoinedFunctionRow;

/// High confidence: a MATCH alignment, resolved (unambiguous) address join,
/// no `PC_LINE_GAP`, and no WARN-tier reasons surfacing on the row.
pub fn is_high_confidence(row: &JoinedFunctionRow) -> bool {
    row.alignment_verdict == "MATCH"
        && row.address_verdict == "RESOLVED"
        && row.ghidra_function_id.is_some()
        && !row.reasons.iter().any(|r| r == "PC_LINE_GAP")
}

/// True if every id in `ids` is unique — `ts_func_id`, `function_id`, and
/// `var_id` must each be unique within their parent sets (`spec.md` §8).
pub fn ids_are_unique(ids: &[String]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().all(|id| seen.insert(id))
}

/// True if `rows` is sorted by `(dwarf_function_id, ghidra_entry_va)`, the
/// documented key for `joined_functions.jsonl`.
pub fn functions_are_sorted(rows: &[JoinedFunctionRow]) -> bool {
    rows.windows(2).all(|pair| {
        let a = (&pair[0].dwarf_function_id, pair[0].ghidra_entry_va.unwrap_or(0));
        let b = (&pair[1].dwarf_function_id, pair[1].ghidra_entry_va.unwrap_or(0));
        a <= b
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(verdict: &str, address: &str, ghidra_id: Option<&str>, reasons: Vec<&str>) -> JoinedFunctionRow {
        JoinedFunctionRow {
            dwarf_function_id: "cu:0:die:0".into(),
            ts_func_id: None,
            ghidra_function_id: ghidra_id.map(str::to_string),
            ghidra_entry_va: Some(0x1000),
            alignment_verdict: verdict.to_string(),
            address_verdict: address.to_string(),
            reasons: reasons.into_iter().map(str::to_string).collect(),
            overlap_ratio: 1.0,
            cfg: None,
            high_confidence: false,
        }
    }

    #[test]
    fn resolved_match_with_no_gap_is_high_confidence() {
        assert!(is_high_confidence(&row("MATCH", "RESOLVED", Some("g1"), vec![])));
    }

    #[test]
    fn pc_line_gap_disqualifies_high_confidence() {
        assert!(!is_high_confidence(&row("MATCH", "RESOLVED", Some("g1"), vec!["PC_LINE_GAP"])));
    }

    #[test]
    fn unresolved_address_disqualifies_high_confidence() {
        assert!(!is_high_confidence(&row("MATCH", "AMBIGUOUS", None, vec![])));
    }

    #[test]
    fn duplicate_ids_are_detected() {
        assert!(!ids_are_unique(&["a".to_string(), "b".to_string(), "a".to_string()]));
        assert!(ids_are_unique(&["a".to_string(), "b".to_string()]));
    }
}
