//! Top-level orchestration for the line-evidence join (C8-C9): build origin
//! maps for every TU, score every DWARF join-target function against every
//! syntactic function, select a best match, and produce in-memory outputs.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use align_common::hash::sha256_bytes;
use oracle_dwarf::schema::{OracleFunctionEntry, OracleFunctionsOutput, OracleReport};
use oracle_ts::schema::{OracleTsFunctions, TsFunctionRecord};

use crate::candidate::{score_candidates, select_best};
use crate::error::JoinError;
use crate::loader::{load_dwarf_outputs, load_i_files, load_ts_outputs};
use crate::origin_map::{build_origin_map, OriginMap};
use crate::policy::{JoinProfile, JoinVerdict};
use crate::schema::{AlignmentPair, AlignmentPairsOutput, AlignmentReport, NonTargetEntry, PairCounts};

fn now_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_string()
}

fn build_evidence(entry: &OracleFunctionEntry) -> BTreeMap<(String, u64), u64> {
    entry
        .line_rows
        .iter()
        .map(|row| ((row.path.clone(), row.line), row.count))
        .collect()
}

/// Runs the full join-dwarf-ts pipeline (C8-C9) given already-loaded
/// DWARF/TS oracle outputs plus the directory of preprocessed `.i` files.
pub fn run_join(
    dwarf_report: &OracleReport,
    dwarf_functions: &OracleFunctionsOutput,
    ts_functions: &OracleTsFunctions,
    i_files_dir: &Path,
    profile: &JoinProfile,
) -> Result<(AlignmentPairsOutput, AlignmentReport), JoinError> {
    let i_files = load_i_files(i_files_dir)?;

    let mut origin_maps: BTreeMap<String, OriginMap> = BTreeMap::new();
    let mut tu_hashes: BTreeMap<String, String> = BTreeMap::new();
    for (tu_path, content) in &i_files {
        let map = build_origin_map(tu_path, content, &profile.excluded_path_prefixes);
        tu_hashes.insert(tu_path.clone(), sha256_bytes(content.as_bytes()));
        origin_maps.insert(tu_path.clone(), map);
    }

    let join_target_ts_functions: Vec<TsFunctionRecord> = ts_functions
        .functions
        .iter()
        .filter(|f| f.verdict != "REJECT")
        .cloned()
        .collect();

    let mut pairs = Vec::new();
    let mut pair_counts = PairCounts::default();
    let mut reason_counts: BTreeMap<String, u64> = BTreeMap::new();

    for func in &dwarf_functions.functions {
        tracing::debug!(function_id = %func.function_id, "join-dwarf-ts: scoring candidates");
        let evidence = build_evidence(func);
        let candidates = score_candidates(
            &evidence,
            func.n_line_rows,
            &join_target_ts_functions,
            &origin_maps,
        );
        let (verdict, best, reasons, near_ties) = select_best(candidates.clone(), profile);

        for reason in &reasons {
            *reason_counts.entry(reason.to_string()).or_insert(0) += 1;
        }
        match verdict {
            JoinVerdict::Match => pair_counts.match_count += 1,
            JoinVerdict::Ambiguous => pair_counts.ambiguous += 1,
            JoinVerdict::NoMatch => pair_counts.no_match += 1,
        }

        let mut all_candidates = candidates;
        // Keep the winner discoverable in the transparency list even if it
        // was removed from `candidates` by `select_best`.
        if let Some(winner) = &best {
            if !all_candidates.iter().any(|c| c.ts_func_id == winner.ts_func_id) {
                all_candidates.push(winner.clone());
            }
        }
        all_candidates.extend(near_ties.iter().cloned());

        pairs.push(AlignmentPair::build(
            &func.function_id,
            func.n_line_rows,
            verdict,
            &reasons,
            best.as_ref(),
            &all_candidates,
        ));
    }

    pair_counts.non_target = dwarf_functions.non_targets.len() as u64;
    let non_targets: Vec<NonTargetEntry> = dwarf_functions
        .non_targets
        .iter()
        .map(|f| NonTargetEntry {
            dwarf_function_id: f.function_id.clone(),
            reasons: f.reasons.clone(),
        })
        .collect();

    pairs.sort_by(|a, b| a.dwarf_function_id.cmp(&b.dwarf_function_id));

    let pairs_output = AlignmentPairsOutput {
        schema_version: crate::schema::SCHEMA_VERSION.to_string(),
        binary_sha256: dwarf_report.binary_sha256.clone(),
        dwarf_profile_id: dwarf_report.profile_id.clone(),
        ts_profile_id: ts_functions.profile_id.clone(),
        join_profile_id: profile.profile_id(),
        pairs,
        non_targets,
    };

    let report = AlignmentReport {
        schema_version: crate::schema::SCHEMA_VERSION.to_string(),
        tu_hashes,
        pair_counts,
        reason_counts,
        overlap_threshold: profile.overlap_threshold,
        epsilon: profile.epsilon,
        min_overlap_lines: profile.min_overlap_lines,
        excluded_path_prefixes: profile.excluded_path_prefixes.clone(),
        timestamp: now_timestamp(),
    };

    Ok((pairs_output, report))
}

/// Convenience entry point: loads DWARF and TS outputs from disk, then runs
/// the join. Matches the pure-function-over-paths shape `spec.md` §4.14
/// requires of every runner.
pub fn run_join_from_paths(
    dwarf_report_path: &Path,
    dwarf_functions_path: &Path,
    ts_report_path: &Path,
    ts_functions_path: &Path,
    i_files_dir: &Path,
    profile: &JoinProfile,
) -> Result<(AlignmentPairsOutput, AlignmentReport), JoinError> {
    let (dwarf_report, dwarf_functions) =
        load_dwarf_outputs(dwarf_report_path, dwarf_functions_path)?;
    let (_ts_report, ts_functions) = load_ts_outputs(ts_report_path, ts_functions_path)?;
    run_join(&dwarf_report, &dwarf_functions, &ts_functions, i_files_dir, profile)
}
