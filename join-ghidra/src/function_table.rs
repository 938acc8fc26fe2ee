//! Ghidra function table (C10): entry-VA lookup plus an interval index over
//! body ranges, with `image_base` rebasing applied once at build time.
//!
//! Per `spec.md` §9: "a sorted vector... binary search; a balanced interval
//! tree is overkill" at the expected scale (tens of thousands of functions
//! per binary).

use std::collections::BTreeMap;

use crate::schema::GhidraFunctionEntry;

#[derive(Debug, Clone)]
struct Interval {
    start: u64,
    end: u64,
    entry_va: u64,
}

pub struct GhidraFunctionTable {
    by_entry_va: BTreeMap<u64, GhidraFunctionEntry>,
    intervals: Vec<Interval>,
}

impl GhidraFunctionTable {
    /// Builds the table from raw Ghidra function records, rebasing every
    /// address by `image_base` before indexing.
    pub fn build(functions: &[GhidraFunctionEntry], image_base: u64) -> Self {
        let mut by_entry_va = BTreeMap::new();
        let mut intervals = Vec::new();

        for func in functions {
            let mut rebased = func.clone();
            rebased.entry_va = func.entry_va + image_base;
            rebased.body_start_va = func.body_start_va.map(|v| v + image_base);
            rebased.body_end_va = func.body_end_va.map(|v| v + image_base);

            if let (Some(start), Some(end)) = (rebased.body_start_va, rebased.body_end_va) {
                if end > start {
                    intervals.push(Interval { start, end, entry_va: rebased.entry_va });
                }
            }
            by_entry_va.insert(rebased.entry_va, rebased);
        }

        intervals.sort_by_key(|i| i.start);

        GhidraFunctionTable { by_entry_va, intervals }
    }

    pub fn get(&self, entry_va: u64) -> Option<&GhidraFunctionEntry> {
        self.by_entry_va.get(&entry_va)
    }

    pub fn body_end(&self, entry_va: u64) -> Option<u64> {
        self.get(entry_va).and_then(|f| f.body_end_va)
    }

    /// Finds the entry VA of the function whose `[body_start, body_end)`
    /// contains `addr`, if any, via binary search over the sorted interval
    /// vector.
    pub fn query_point(&self, addr: u64) -> Option<u64> {
        let idx = self.intervals.partition_point(|i| i.start <= addr);
        if idx == 0 {
            return None;
        }
        let candidate = &self.intervals[idx - 1];
        if addr >= candidate.start && addr < candidate.end {
            Some(candidate.entry_va)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn rebases_addresses_by_image_base() {
        let table = GhidraFunctionTable::build(&[func(0x1000, 0x1000, 0x1010)], 0x400000);
        assert!(table.get(0x401000).is_some());
        assert_eq!(table.query_point(0x401005), Some(0x401000));
    }

    #[test]
    fn query_point_outside_any_interval_is_none() {
        let table = GhidraFunctionTable::build(&[func(0x1000, 0x1000, 0x1010)], 0);
        assert_eq!(table.query_point(0x2000), None);
    }

    #[test]
    fn query_point_picks_correct_interval_among_many() {
        let funcs = vec![func(0x1000, 0x1000, 0x1010), func(0x2000, 0x2000, 0x2020)];
        let table = GhidraFunctionTable::build(&funcs, 0);
        assert_eq!(table.query_point(0x2010), Some(0x2000));
    }
}
