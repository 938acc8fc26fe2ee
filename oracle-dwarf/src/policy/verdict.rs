//! Binary and function level gates (C4).
//!
//! Reason strings are the closed, stable taxonomy from `spec.md` §4.4; they
//! are never renamed or repurposed across versions (a meaning change is a
//! profile-id bump, per §7).

use serde::{Deserialize, Serialize};

use crate::dwarf::FunctionEntry;
use crate::elf::ElfMeta;
use crate::line_mapper::LineSpan;
use crate::policy::profile::DwarfProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Accept,
    Warn,
    Reject,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Accept => "ACCEPT",
            Verdict::Warn => "WARN",
            Verdict::Reject => "REJECT",
        }
    }

    /// A function is a join target when verdict is ACCEPT or WARN.
    pub fn is_join_target(self) -> bool {
        !matches!(self, Verdict::Reject)
    }
}

/// Gates a whole binary before any function-level work starts. A nonempty
/// reason list always means REJECT.
pub fn gate_binary(elf: &ElfMeta) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if !elf.has_debug_info {
        reasons.push("NO_DEBUG_INFO");
    }
    if !elf.has_debug_line {
        reasons.push("NO_DEBUG_LINE");
    }
    if elf.machine != "EM_X86_64" || elf.elf_class != 2 {
        reasons.push("UNSUPPORTED_ARCH");
    }
    if elf.has_split_dwarf {
        reasons.push("SPLIT_DWARF");
    }
    reasons
}

/// Judges a single DWARF function against its line evidence.
///
/// Priority order: REJECT reasons are checked first and, if any fire, WARN
/// checks are skipped entirely (a rejected function carries only its REJECT
/// reasons). Otherwise WARN reasons accumulate and ACCEPT is the default.
pub fn judge_function(
    entry: &FunctionEntry,
    line_span: &LineSpan,
    profile: &DwarfProfile,
) -> (Verdict, Vec<&'static str>) {
    let mut reject_reasons = Vec::new();
    if entry.is_declaration {
        reject_reasons.push("DECLARATION_ONLY");
    }
    if entry.ranges.is_empty() {
        reject_reasons.push("MISSING_RANGE");
    } else if line_span.is_empty() {
        reject_reasons.push("NO_LINE_ROWS_IN_RANGE");
    }

    if !reject_reasons.is_empty() {
        return (Verdict::Reject, reject_reasons);
    }

    let mut warn_reasons = Vec::new();
    if entry.name.is_none() {
        warn_reasons.push("NAME_MISSING");
    }
    if line_span.dominant_file_ratio < profile.multi_file_ratio_threshold {
        warn_reasons.push("MULTI_FILE_RANGE");
    }
    if let Some(dominant) = &line_span.dominant_file {
        if profile.is_system_header(dominant) {
            warn_reasons.push("SYSTEM_HEADER_DOMINANT");
        }
    }
    if entry.ranges.len() > profile.max_fragments_warn {
        warn_reasons.push("RANGES_FRAGMENTED");
    }

    if warn_reasons.is_empty() {
        (Verdict::Accept, warn_reasons)
    } else {
        (Verdict::Warn, warn_reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dwarf::AddressRange;
    use std::collections::BTreeMap;

    fn base_entry() -> FunctionEntry {
        FunctionEntry {
            function_id: "cu:0:die:0".into(),
            die_offset: 0,
            cu_offset: 0,
            name: Some("f".into()),
            linkage_name: None,
            is_declaration: false,
            ranges: vec![AddressRange { low: 0x1000, high: 0x1010 }],
            decl_file: None,
            decl_line: None,
            decl_column: None,
            comp_dir: None,
        }
    }

    fn base_span() -> LineSpan {
        let mut line_rows = BTreeMap::new();
        line_rows.insert(("main.c".to_string(), 1), 1);
        let mut file_row_counts = BTreeMap::new();
        file_row_counts.insert("main.c".to_string(), 1);
        LineSpan {
            dominant_file: Some("main.c".into()),
            dominant_file_ratio: 1.0,
            line_min: Some(1),
            line_max: Some(1),
            n_line_rows: 1,
            file_row_counts,
            line_rows,
        }
    }

    #[test]
    fn accepts_clean_function() {
        let (verdict, reasons) = judge_function(&base_entry(), &base_span(), &DwarfProfile::v0());
        assert_eq!(verdict, Verdict::Accept);
        assert!(reasons.is_empty());
    }

    #[test]
    fn rejects_declaration_only() {
        let mut entry = base_entry();
        entry.is_declaration = true;
        let (verdict, reasons) = judge_function(&entry, &base_span(), &DwarfProfile::v0());
        assert_eq!(verdict, Verdict::Reject);
        assert_eq!(reasons, vec!["DECLARATION_ONLY"]);
    }

    #[test]
    fn rejects_empty_evidence() {
        let entry = base_entry();
        let (verdict, reasons) = judge_function(&entry, &LineSpan::default(), &DwarfProfile::v0());
        assert_eq!(verdict, Verdict::Reject);
        assert_eq!(reasons, vec!["NO_LINE_ROWS_IN_RANGE"]);
    }

    #[test]
    fn warns_on_missing_name() {
        let mut entry = base_entry();
        entry.name = None;
        let (verdict, reasons) = judge_function(&entry, &base_span(), &DwarfProfile::v0());
        assert_eq!(verdict, Verdict::Warn);
        assert_eq!(reasons, vec!["NAME_MISSING"]);
    }

    #[test]
    fn warns_on_system_header_dominant() {
        let mut span = base_span();
        span.dominant_file = Some("/usr/include/stdio.h".into());
        let (verdict, reasons) = judge_function(&base_entry(), &span, &DwarfProfile::v0());
        assert_eq!(verdict, Verdict::Warn);
        assert!(reasons.contains(&"SYSTEM_HEADER_DOMINANT"));
    }
}
