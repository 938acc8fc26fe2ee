//! Typed output records for the oracle-dwarf stage (C13, local half).
//!
//! Every record derives `Serialize`/`Deserialize`/`Debug`/`Clone`; optional
//! fields are plain `Option<T>` so missing values render as explicit `null`
//! rather than being omitted, per `SPEC_FULL.md` §3.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dwarf::{AddressRange, FunctionEntry};
use crate::line_mapper::LineSpan;
use crate::policy::Verdict;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressRangeRecord {
    pub low: u64,
    pub high: u64,
}

impl From<&AddressRange> for AddressRangeRecord {
    fn from(r: &AddressRange) -> Self {
        AddressRangeRecord { low: r.low, high: r.high }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineRowRecord {
    pub path: String,
    pub line: u64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRowCountRecord {
    pub path: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleFunctionEntry {
    pub function_id: String,
    pub cu_offset: String,
    pub die_offset: String,
    pub name: Option<String>,
    pub linkage_name: Option<String>,
    pub is_declaration: bool,
    pub ranges: Vec<AddressRangeRecord>,
    pub decl_file: Option<String>,
    pub decl_line: Option<u64>,
    pub decl_column: Option<u64>,
    pub comp_dir: Option<String>,
    pub verdict: String,
    pub reasons: Vec<String>,
    pub dominant_file: Option<String>,
    pub dominant_file_ratio: f64,
    pub line_min: Option<u64>,
    pub line_max: Option<u64>,
    pub n_line_rows: u64,
    pub file_row_counts: Vec<FileRowCountRecord>,
    pub line_rows: Vec<LineRowRecord>,
}

impl OracleFunctionEntry {
    pub fn build(
        entry: &FunctionEntry,
        span: &LineSpan,
        verdict: Verdict,
        reasons: &[&'static str],
    ) -> Self {
        let mut file_row_counts: Vec<FileRowCountRecord> = span
            .file_row_counts
            .iter()
            .map(|(path, count)| FileRowCountRecord {
                path: path.clone(),
                count: *count,
            })
            .collect();
        file_row_counts.sort_by(|a, b| a.path.cmp(&b.path));

        let mut line_rows: Vec<LineRowRecord> = span
            .line_rows
            .iter()
            .map(|((path, line), count)| LineRowRecord {
                path: path.clone(),
                line: *line,
                count: *count,
            })
            .collect();
        line_rows.sort_by(|a, b| (a.path.as_str(), a.line).cmp(&(b.path.as_str(), b.line)));

        OracleFunctionEntry {
            function_id: entry.function_id.clone(),
            cu_offset: format!("{:x}", entry.cu_offset),
            die_offset: format!("{:x}", entry.die_offset),
            name: entry.name.clone(),
            linkage_name: entry.linkage_name.clone(),
            is_declaration: entry.is_declaration,
            ranges: entry.ranges.iter().map(AddressRangeRecord::from).collect(),
            decl_file: entry.decl_file.clone(),
            decl_line: entry.decl_line,
            decl_column: entry.decl_column,
            comp_dir: entry.comp_dir.clone(),
            verdict: verdict.as_str().to_string(),
            reasons: reasons.iter().map(|s| s.to_string()).collect(),
            dominant_file: span.dominant_file.clone(),
            dominant_file_ratio: span.dominant_file_ratio,
            line_min: span.line_min,
            line_max: span.line_max,
            n_line_rows: span.n_line_rows,
            file_row_counts,
            line_rows,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleFunctionsOutput {
    pub schema_version: String,
    pub binary_sha256: String,
    pub profile_id: String,
    pub functions: Vec<OracleFunctionEntry>,
    pub non_targets: Vec<OracleFunctionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElfSummary {
    pub machine: String,
    pub elf_class: u8,
    pub endianness: String,
    pub build_id: Option<String>,
    pub debug_section_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleReport {
    pub schema_version: String,
    pub binary_path: String,
    pub binary_sha256: String,
    pub profile_id: String,
    pub verdict: String,
    pub reasons: Vec<String>,
    pub elf: ElfSummary,
    pub function_counts: FunctionCounts,
    pub reason_counts: BTreeMap<String, u64>,
    /// Wall-clock run time, seconds since the Unix epoch. The single
    /// non-deterministic field in this report; excluded from byte-equality
    /// checks (`spec.md` §6).
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FunctionCounts {
    pub accept: u64,
    pub warn: u64,
    pub reject: u64,
}

/// Schema version this crate emits. Consumers (`join-dwarf-ts`) enforce a
/// floor of `0.2` for `line_rows` support, per `SPEC_FULL.md` §4.14.
pub const SCHEMA_VERSION: &str = "0.2.0";
