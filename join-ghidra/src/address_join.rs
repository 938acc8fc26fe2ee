//! Address join (C10): resolves a DWARF function's address ranges against
//! the Ghidra function table.

use std::collections::BTreeSet;

use crate::function_table::GhidraFunctionTable;

/// Resolves one DWARF function's ranges to a single Ghidra entry VA.
///
/// For each range, queries the interval index at the range's low address;
/// if the matched entry's body ends before the range's high address (the
/// match covers only a prefix of the range), also queries the range's
/// midpoint and accumulates that candidate too. A resolved join requires
/// exactly one distinct candidate across all ranges.
pub fn resolve_function(
    ranges: &[(u64, u64)],
    table: &GhidraFunctionTable,
) -> (Option<u64>, Vec<&'static str>) {
    let mut candidates = BTreeSet::new();

    for &(low, high) in ranges {
        match table.query_point(low) {
            Some(entry_va) => {
                candidates.insert(entry_va);
                if let Some(body_end) = table.body_end(entry_va) {
                    if body_end < high {
                        let mid = low + (high - low) / 2;
                        if let Some(other) = table.query_point(mid) {
                            candidates.insert(other);
                        }
                    }
                }
            }
            None => {
                let mid = low + (high.saturating_sub(low)) / 2;
                if let Some(entry_va) = table.query_point(mid) {
                    candidates.insert(entry_va);
                }
            }
        }
    }

    match candidates.len() {
        0 => (None, vec!["ADDRESS_NO_MATCH"]),
        1 => (candidates.into_iter().next(), Vec::new()),
        _ => (None, vec!["ADDRESS_AMBIGUOUS"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::GhidraFunctionEntry;

    fn func(entry_va: u64, start: u64, end: u64) -> GhidraFunctionEntry {
        GhidraFunctionEntry {
            binary_id: "b".into(),
            function_id: format!("f{entry_va:x}"),
            entry_va,
            entry_hex: format!("{entry_va:#x}"),
            name: "f".into(),
            namespace: None,
            body_start_va: Some(start),
            body_end_va: Some(end),
            size_bytes: Some(end - start),
            is_external_block: false,
            is_thunk: false,
            is_import: false,
            section_hint: None,
            decompile_status: "OK".into(),
            c_raw: None,
            decompile_error: None,
            warnings: Vec::new(),
            warnings_raw: Vec::new(),
            verdict: "ACCEPT".into(),
            is_plt_or_stub: false,
            is_init_fini_aux: false,
            is_compiler_aux: false,
            is_library_like: false,
            asm_insn_count: None,
            c_line_count: None,
            insn_to_c_ratio: None,
            temp_var_count: None,
            fat_function_flag: false,
        }
    }

    #[test]
    fn single_range_fully_inside_one_function_resolves() {
        let table = GhidraFunctionTable::build(&[func(0x1000, 0x1000, 0x1020)], 0);
        let (entry, reasons) = resolve_function(&[(0x1000, 0x1010)], &table);
        assert_eq!(entry, Some(0x1000));
        assert!(reasons.is_empty());
    }

    #[test]
    fn no_match_anywhere_is_address_no_match() {
        let table = GhidraFunctionTable::build(&[func(0x1000, 0x1000, 0x1010)], 0);
        let (entry, reasons) = resolve_function(&[(0x9000, 0x9010)], &table);
        assert_eq!(entry, None);
        assert_eq!(reasons, vec!["ADDRESS_NO_MATCH"]);
    }

    #[test]
    fn conflicting_candidates_across_ranges_are_ambiguous() {
        let funcs = vec![func(0x1000, 0x1000, 0x1010), func(0x2000, 0x2000, 0x2010)];
        let table = GhidraFunctionTable::build(&funcs, 0);
        let (entry, reasons) =
            resolve_function(&[(0x1000, 0x1005), (0x2000, 0x2005)], &table);
        assert_eq!(entry, None);
        assert_eq!(reasons, vec!["ADDRESS_AMBIGUOUS"]);
    }
}
