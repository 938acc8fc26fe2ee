//! Loads the build receipt, DWARF oracle outputs, alignment outputs, and
//! Ghidra outputs from disk.
//!
//! Structured JSON documents (`report.json`, `alignment_pairs.json`, the
//! build receipt) must parse whole — a malformed document is a tier-1
//! error. JSONL streams (`functions.jsonl`, `variables.jsonl`, `cfg.jsonl`,
//! `calls.jsonl`) admit partial input per `spec.md` §7 tier 4: a malformed
//! line is logged and skipped, the surrounding load continues.

use std::path::Path;

use join_dwarf_ts::schema::{AlignmentPairsOutput, AlignmentReport};
use oracle_dwarf::schema::{OracleFunctionsOutput, OracleReport};

use crate::build_context::BuildReceipt;
use crate::error::GhidraJoinError;
use crate::schema::{GhidraCallEntry, GhidraCfgEntry, GhidraFunctionEntry, GhidraReport, GhidraVariableEntry};

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, GhidraJoinError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Parses one JSON object per nonblank line, skipping and logging any line
/// that fails to parse rather than aborting the whole load.
fn load_jsonl<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, GhidraJoinError> {
    let contents = std::fs::read_to_string(path)?;
    let mut out = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => out.push(record),
            Err(err) => {
                tracing::warn!(path = %path.display(), lineno, %err, "skipping malformed JSONL record");
            }
        }
    }
    Ok(out)
}

pub fn load_build_receipt(path: &Path) -> Result<BuildReceipt, GhidraJoinError> {
    load_json(path)
}

pub fn load_oracle_outputs(
    report_path: &Path,
    functions_path: &Path,
) -> Result<(OracleReport, OracleFunctionsOutput), GhidraJoinError> {
    Ok((load_json(report_path)?, load_json(functions_path)?))
}

pub fn load_alignment_outputs(
    pairs_path: &Path,
    report_path: &Path,
) -> Result<(AlignmentPairsOutput, AlignmentReport), GhidraJoinError> {
    Ok((load_json(pairs_path)?, load_json(report_path)?))
}

pub struct GhidraOutputs {
    pub report: GhidraReport,
    pub functions: Vec<GhidraFunctionEntry>,
    pub variables: Vec<GhidraVariableEntry>,
    pub cfg: Vec<GhidraCfgEntry>,
    pub calls: Vec<GhidraCallEntry>,
}

pub fn load_ghidra_outputs(
    report_path: &Path,
    functions_path: &Path,
    variables_path: &Path,
    cfg_path: &Path,
    calls_path: &Path,
) -> Result<GhidraOutputs, GhidraJoinError> {
    Ok(GhidraOutputs {
        report: load_json(report_path)?,
        functions: load_jsonl(functions_path)?,
        variables: load_jsonl(variables_path)?,
        cfg: load_jsonl(cfg_path)?,
        calls: load_jsonl(calls_path)?,
    })
}
