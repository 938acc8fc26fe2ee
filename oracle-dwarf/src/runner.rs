//! Top-level orchestration for the oracle-dwarf stage (C14): load a binary,
//! gate it, walk its functions, judge each, and produce in-memory outputs.
//!
//! A runner is a pure function of `(binary_path, profile) -> outputs`; disk
//! writing is an optional, separate step left to the caller (`align-cli`).

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::dwarf::{iter_cus, extract_functions, DwarfData};
use crate::elf::read_elf;
use crate::error::OracleDwarfError;
use crate::line_mapper::compute_line_span;
use crate::policy::{gate_binary, judge_function, DwarfProfile, Verdict};
use crate::schema::{
    ElfSummary, FunctionCounts, OracleFunctionEntry, OracleFunctionsOutput, OracleReport,
};

fn now_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_string()
}

/// Runs the full oracle-dwarf pipeline (C1-C4) against one binary.
pub fn run_oracle_dwarf(
    binary_path: &str,
    profile: &DwarfProfile,
) -> Result<(OracleReport, OracleFunctionsOutput), OracleDwarfError> {
    tracing::info!(binary_path, "oracle-dwarf: reading ELF");
    let elf = read_elf(binary_path)?;
    let profile_id = profile.profile_id();

    let elf_summary = ElfSummary {
        machine: elf.machine.clone(),
        elf_class: elf.elf_class,
        endianness: elf.endianness.to_string(),
        build_id: elf.build_id.clone(),
        debug_section_names: elf.debug_section_names.clone(),
    };

    let gate_reasons = gate_binary(&elf);
    if !gate_reasons.is_empty() {
        tracing::warn!(?gate_reasons, "oracle-dwarf: binary rejected");
        let report = OracleReport {
            schema_version: crate::schema::SCHEMA_VERSION.to_string(),
            binary_path: binary_path.to_string(),
            binary_sha256: elf.file_sha256.clone(),
            profile_id: profile_id.clone(),
            verdict: Verdict::Reject.as_str().to_string(),
            reasons: gate_reasons.iter().map(|s| s.to_string()).collect(),
            elf: elf_summary,
            function_counts: FunctionCounts::default(),
            reason_counts: gate_reasons.iter().map(|r| (r.to_string(), 1)).collect(),
            timestamp: now_timestamp(),
        };
        let functions = OracleFunctionsOutput {
            schema_version: crate::schema::SCHEMA_VERSION.to_string(),
            binary_sha256: elf.file_sha256,
            profile_id,
            functions: Vec::new(),
            non_targets: Vec::new(),
        };
        return Ok((report, functions));
    }

    let dwarf_data = DwarfData::open(binary_path)?;
    let dwarf = dwarf_data.load()?;

    let mut targets = Vec::new();
    let mut non_targets = Vec::new();
    let mut counts = FunctionCounts::default();
    let mut reason_counts: BTreeMap<String, u64> = BTreeMap::new();

    for (cu_info, unit) in iter_cus(&dwarf)? {
        let functions = extract_functions(&dwarf, &unit, cu_info.cu_offset, cu_info.comp_dir.as_deref())?;
        for entry in functions {
            let span = compute_line_span(&dwarf, &unit, cu_info.comp_dir.as_deref(), &entry.ranges)?;
            let (verdict, reasons) = judge_function(&entry, &span, profile);

            for reason in &reasons {
                *reason_counts.entry(reason.to_string()).or_insert(0) += 1;
            }
            match verdict {
                Verdict::Accept => counts.accept += 1,
                Verdict::Warn => counts.warn += 1,
                Verdict::Reject => counts.reject += 1,
            }

            let record = OracleFunctionEntry::build(&entry, &span, verdict, &reasons);
            if verdict.is_join_target() {
                targets.push(record);
            } else {
                non_targets.push(record);
            }
        }
    }

    targets.sort_by(|a, b| a.function_id.cmp(&b.function_id));
    non_targets.sort_by(|a, b| a.function_id.cmp(&b.function_id));

    let report = OracleReport {
        schema_version: crate::schema::SCHEMA_VERSION.to_string(),
        binary_path: binary_path.to_string(),
        binary_sha256: elf.file_sha256.clone(),
        profile_id: profile_id.clone(),
        verdict: Verdict::Accept.as_str().to_string(),
        reasons: Vec::new(),
        elf: elf_summary,
        function_counts: counts,
        reason_counts,
        timestamp: now_timestamp(),
    };
    let functions = OracleFunctionsOutput {
        schema_version: crate::schema::SCHEMA_VERSION.to_string(),
        binary_sha256: elf.file_sha256,
        profile_id,
        functions: targets,
        non_targets,
    };

    Ok((report, functions))
}
