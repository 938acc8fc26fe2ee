//! Top-level orchestration for the address join (C10-C13): resolve build
//! context, load every input, cross-validate SHA-256 coherence, resolve
//! each DWARF join-target function's address ranges against Ghidra, and
//! produce the final joined dataset.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use join_dwarf_ts::schema::{AlignmentPairsOutput, AlignmentReport};
use oracle_dwarf::schema::{OracleFunctionEntry, OracleFunctionsOutput, OracleReport};

use crate::address_join::resolve_function;
use crate::build_context::{resolve_build_context, BuildContext, BuildReceipt};
use crate::cross_validate::cross_validate_sha256;
use crate::diagnostics::is_high_confidence;
use crate::error::GhidraJoinError;
use crate::function_table::GhidraFunctionTable;
use crate::loader::{
    load_alignment_outputs, load_build_receipt, load_ghidra_outputs, load_oracle_outputs, GhidraOutputs,
};
use crate::policy::JoinGhidraProfile;
use crate::schema::{
    JoinFunctionCounts, JoinReport, JoinedCfgShape, JoinedFunctionRow, JoinedVariableRow,
};

fn now_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_string()
}

pub struct JoinGhidraInputs {
    pub receipt: BuildReceipt,
    pub dwarf_report: OracleReport,
    pub dwarf_functions: OracleFunctionsOutput,
    pub alignment_pairs: AlignmentPairsOutput,
    pub alignment_report: AlignmentReport,
    pub ghidra: GhidraOutputs,
}

/// Loads every input file this stage needs from disk.
#[allow(clippy::too_many_arguments)]
pub fn load_inputs(
    receipt_path: &Path,
    dwarf_report_path: &Path,
    dwarf_functions_path: &Path,
    alignment_pairs_path: &Path,
    alignment_report_path: &Path,
    ghidra_report_path: &Path,
    ghidra_functions_path: &Path,
    ghidra_variables_path: &Path,
    ghidra_cfg_path: &Path,
    ghidra_calls_path: &Path,
) -> Result<JoinGhidraInputs, GhidraJoinError> {
    let receipt = load_build_receipt(receipt_path)?;
    let (dwarf_report, dwarf_functions) = load_oracle_outputs(dwarf_report_path, dwarf_functions_path)?;
    let (alignment_pairs, alignment_report) =
        load_alignment_outputs(alignment_pairs_path, alignment_report_path)?;
    let ghidra = load_ghidra_outputs(
        ghidra_report_path,
        ghidra_functions_path,
        ghidra_variables_path,
        ghidra_cfg_path,
        ghidra_calls_path,
    )?;
    Ok(JoinGhidraInputs { receipt, dwarf_report, dwarf_functions, alignment_pairs, alignment_report, ghidra })
}

/// Runs the address join (C10-C13) over already-loaded inputs.
pub fn run_join_oracles_ghidra(
    inputs: &JoinGhidraInputs,
    ghidra_binary_sha256_override: Option<&str>,
    profile: &JoinGhidraProfile,
) -> Result<(JoinReport, Vec<JoinedFunctionRow>, Vec<JoinedVariableRow>), GhidraJoinError> {
    let ctx: BuildContext = resolve_build_context(
        &inputs.receipt,
        &inputs.dwarf_report.binary_sha256,
        ghidra_binary_sha256_override,
    )?;

    cross_validate_sha256(
        &ctx,
        &inputs.dwarf_report.binary_sha256,
        &inputs.alignment_pairs.binary_sha256,
        &inputs.ghidra.report.binary_sha256,
    )?;

    let table = GhidraFunctionTable::build(&inputs.ghidra.functions, inputs.ghidra.report.image_base);

    let cfg_by_function_id: BTreeMap<&str, &crate::schema::GhidraCfgEntry> =
        inputs.ghidra.cfg.iter().map(|c| (c.function_id.as_str(), c)).collect();
    let variables_by_function_id: BTreeMap<&str, Vec<&crate::schema::GhidraVariableEntry>> =
        inputs.ghidra.variables.iter().fold(BTreeMap::new(), |mut acc, v| {
            acc.entry(v.function_id.as_str()).or_default().push(v);
            acc
        });

    let dwarf_by_id: BTreeMap<&str, &OracleFunctionEntry> = inputs
        .dwarf_functions
        .functions
        .iter()
        .map(|f| (f.function_id.as_str(), f))
        .collect();

    let mut rows = Vec::new();
    let mut variable_rows = Vec::new();
    let mut counts = JoinFunctionCounts::default();
    let mut reason_counts: BTreeMap<String, u64> = BTreeMap::new();

    for pair in &inputs.alignment_pairs.pairs {
        match pair.verdict.as_str() {
            "MATCH" => counts.match_count += 1,
            "AMBIGUOUS" => counts.ambiguous += 1,
            _ => counts.no_match += 1,
        }
        for reason in &pair.reasons {
            *reason_counts.entry(reason.clone()).or_insert(0) += 1;
        }

        let Some(dwarf_func) = dwarf_by_id.get(pair.dwarf_function_id.as_str()) else {
            continue;
        };

        let mut reasons: Vec<String> = pair.reasons.clone();
        let (address_verdict, ghidra_function_id, ghidra_entry_va, cfg) =
            if dwarf_func.name.as_deref().map(|n| profile.is_aux_name(n)).unwrap_or(false) {
                reasons.push("AUX_FUNCTION_EXCLUDED".to_string());
                *reason_counts.entry("AUX_FUNCTION_EXCLUDED".to_string()).or_insert(0) += 1;
                ("NOT_ELIGIBLE".to_string(), None, None, None)
            } else {
                let ranges: Vec<(u64, u64)> =
                    dwarf_func.ranges.iter().map(|r| (r.low, r.high)).collect();
                let (resolved, address_reasons) = resolve_function(&ranges, &table);
                for reason in &address_reasons {
                    reasons.push(reason.to_string());
                    *reason_counts.entry(reason.to_string()).or_insert(0) += 1;
                }
                match resolved {
                    Some(entry_va) => {
                        counts.address_resolved += 1;
                        let ghidra_entry = table.get(entry_va);
                        let function_id = ghidra_entry.map(|f| f.function_id.clone());
                        let cfg = function_id
                            .as_deref()
                            .and_then(|id| cfg_by_function_id.get(id))
                            .map(|c| JoinedCfgShape {
                                bb_count: c.bb_count,
                                edge_count: c.edge_count,
                                cyclomatic: c.cyclomatic,
                                has_indirect_jumps: c.has_indirect_jumps,
                            });
                        ("RESOLVED".to_string(), function_id, Some(entry_va), cfg)
                    }
                    None => {
                        if address_reasons.contains(&"ADDRESS_AMBIGUOUS") {
                            counts.address_ambiguous += 1;
                        }
                        ("UNRESOLVED".to_string(), None, None, None)
                    }
                }
            };

        let row = JoinedFunctionRow {
            dwarf_function_id: pair.dwarf_function_id.clone(),
            ts_func_id: pair.ts_func_id.clone(),
            ghidra_function_id: ghidra_function_id.clone(),
            ghidra_entry_va,
            alignment_verdict: pair.verdict.clone(),
            address_verdict,
            reasons,
            overlap_ratio: pair.overlap_ratio,
            cfg,
            high_confidence: false,
        };
        let high_confidence = is_high_confidence(&row);
        if high_confidence {
            counts.high_confidence += 1;
        }

        if let Some(function_id) = &ghidra_function_id {
            if let Some(vars) = variables_by_function_id.get(function_id.as_str()) {
                for var in vars {
                    variable_rows.push(JoinedVariableRow {
                        dwarf_function_id: pair.dwarf_function_id.clone(),
                        ghidra_function_id: function_id.clone(),
                        var_id: var.var_id.clone(),
                        name: var.name.clone(),
                        var_kind: var.var_kind.clone(),
                        type_str: var.type_str.clone(),
                        storage_class: var.storage_class.clone(),
                        is_temp_singleton: var.is_temp_singleton,
                    });
                }
            }
        }

        rows.push(JoinedFunctionRow { high_confidence, ..row });
    }

    counts.non_target = inputs.alignment_pairs.non_targets.len() as u64;

    rows.sort_by(|a, b| {
        (a.dwarf_function_id.as_str(), a.ghidra_entry_va.unwrap_or(0))
            .cmp(&(b.dwarf_function_id.as_str(), b.ghidra_entry_va.unwrap_or(0)))
    });
    variable_rows.sort_by(|a, b| {
        (a.dwarf_function_id.as_str(), a.ghidra_function_id.as_str())
            .cmp(&(b.dwarf_function_id.as_str(), b.ghidra_function_id.as_str()))
    });

    let report = JoinReport {
        schema_version: crate::schema::SCHEMA_VERSION.to_string(),
        binary_sha256: ctx.binary_sha256.clone(),
        ghidra_binary_sha256: ctx.ghidra_binary_sha256.clone(),
        job_id: ctx.job_id.clone(),
        test_case: ctx.test_case.clone(),
        opt: ctx.opt.clone(),
        variant: ctx.variant.clone(),
        ghidra_variant: ctx.ghidra_variant.clone(),
        builder_profile_id: ctx.builder_profile_id.clone(),
        dwarf_profile_id: inputs.dwarf_report.profile_id.clone(),
        ts_profile_id: inputs.alignment_pairs.ts_profile_id.clone(),
        join_profile_id: inputs.alignment_pairs.join_profile_id.clone(),
        ghidra_join_profile_id: profile.profile_id(),
        function_counts: counts,
        reason_counts,
        timestamp: now_timestamp(),
    };

    Ok((report, rows, variable_rows))
}
