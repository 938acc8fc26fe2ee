//! Line mapper (C3): intersects a function's address ranges with its CU's
//! line program to produce the per-function evidence multiset.
//!
//! File-index resolution is delegated to gimli's own `LineRow::file` /
//! `FileEntry` accessors, which already normalize DWARF v4's 1-based vs
//! v5's 0-based file-index convention — see `DESIGN.md` Open Question (a).

use std::collections::BTreeMap;

use gimli::AttributeValue;

use crate::dwarf::{AddressRange, Dwarf, Unit};
use crate::error::OracleDwarfError;

/// Aggregated line information for a single function's address ranges.
#[derive(Debug, Clone, Default)]
pub struct LineSpan {
    pub dominant_file: Option<String>,
    pub dominant_file_ratio: f64,
    pub line_min: Option<u64>,
    pub line_max: Option<u64>,
    pub n_line_rows: u64,
    pub file_row_counts: BTreeMap<String, u64>,
    /// Per-(file, line) hit counts — the multiset of DWARF line evidence.
    pub line_rows: BTreeMap<(String, u64), u64>,
}

impl LineSpan {
    pub fn is_empty(&self) -> bool {
        self.n_line_rows == 0
    }
}

struct Row {
    path: String,
    line: u64,
}

fn resolve_path<'a>(
    dwarf: &Dwarf<'a>,
    unit: &Unit<'a>,
    header: &gimli::LineProgramHeader<crate::dwarf::Slice<'a>>,
    file: &gimli::FileEntry<crate::dwarf::Slice<'a>>,
    comp_dir: Option<&str>,
) -> Option<String> {
    let name = dwarf.attr_string(unit, file.path_name()).ok()?;
    let mut path = String::new();

    if file.directory_index() != 0 {
        if let Some(dir) = file.directory(header) {
            if let Ok(dir_str) = dwarf.attr_string(unit, dir) {
                path.push_str(&dir_str.to_string_lossy());
                path.push('/');
            }
        }
    }
    path.push_str(&name.to_string_lossy());

    if let Some(comp_dir) = comp_dir {
        if !path.starts_with('/') {
            return Some(format!("{comp_dir}/{path}"));
        }
    }
    Some(path)
}

fn in_ranges(address: u64, ranges: &[AddressRange]) -> bool {
    ranges.iter().any(|r| r.low <= address && address < r.high)
}

/// Given a function's address ranges and its parent CU, replays the line
/// program and intersects rows against the ranges to produce a [`LineSpan`].
pub fn compute_line_span<'a>(
    dwarf: &Dwarf<'a>,
    unit: &Unit<'a>,
    comp_dir: Option<&str>,
    ranges: &[AddressRange],
) -> Result<LineSpan, OracleDwarfError> {
    if ranges.is_empty() {
        return Ok(LineSpan::default());
    }

    let Some(program) = unit.line_program.clone() else {
        return Ok(LineSpan::default());
    };

    let mut matched: Vec<Row> = Vec::new();
    let mut rows = program.rows();
    while let Some((header, row)) = rows.next_row()? {
        if row.end_sequence() {
            continue;
        }
        if !in_ranges(row.address(), ranges) {
            continue;
        }
        let Some(file) = row.file(header) else {
            continue;
        };
        let Some(path) = resolve_path(dwarf, unit, header, &file, comp_dir) else {
            continue;
        };
        let line = match row.line() {
            Some(line) => line.get(),
            None => continue,
        };
        matched.push(Row { path, line });
    }

    if matched.is_empty() {
        return Ok(LineSpan::default());
    }

    let mut file_row_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut line_rows: BTreeMap<(String, u64), u64> = BTreeMap::new();
    for row in &matched {
        *file_row_counts.entry(row.path.clone()).or_insert(0) += 1;
        *line_rows.entry((row.path.clone(), row.line)).or_insert(0) += 1;
    }

    // Dominant file: highest row count, ties broken lexicographically.
    let dominant_file = file_row_counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(path, _)| path.clone())
        .expect("file_row_counts is non-empty");
    let dominant_count = file_row_counts[&dominant_file];
    let total = matched.len() as u64;
    let ratio = (dominant_count as f64 / total as f64 * 10000.0).round() / 10000.0;

    let dominant_lines: Vec<u64> = matched
        .iter()
        .filter(|r| r.path == dominant_file)
        .map(|r| r.line)
        .collect();
    let line_min = dominant_lines.iter().min().copied();
    let line_max = dominant_lines.iter().max().copied();

    Ok(LineSpan {
        dominant_file: Some(dominant_file),
        dominant_file_ratio: ratio,
        line_min,
        line_max,
        n_line_rows: total,
        file_row_counts,
        line_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_tie_break_is_deterministic() {
        let mut counts = BTreeMap::new();
        counts.insert("b.c".to_string(), 2u64);
        counts.insert("a.c".to_string(), 2u64);
        let dominant = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(path, _)| path.clone())
            .unwrap();
        assert_eq!(dominant, "a.c");
    }
}
