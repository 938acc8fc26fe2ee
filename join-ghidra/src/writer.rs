//! Deterministic disk writers for the joined dataset.

use std::path::Path;

use align_common::json::{to_json_string, to_jsonl_string};

use crate::error::GhidraJoinError;
use crate::schema::{JoinReport, JoinedFunctionRow, JoinedVariableRow};

fn write_string(path: &Path, contents: &str) -> Result<(), GhidraJoinError> {
    std::fs::write(path, contents).map_err(GhidraJoinError::from)
}

pub fn write_report(path: &Path, report: &JoinReport) -> Result<(), GhidraJoinError> {
    let rendered = to_json_string(report)?;
    write_string(path, &rendered)
}

pub fn write_functions(path: &Path, rows: &[JoinedFunctionRow]) -> Result<(), GhidraJoinError> {
    let rendered = to_jsonl_string(rows)?;
    write_string(path, &rendered)
}

pub fn write_variables(path: &Path, rows: &[JoinedVariableRow]) -> Result<(), GhidraJoinError> {
    let rendered = to_jsonl_string(rows)?;
    write_string(path, &rendered)
}
