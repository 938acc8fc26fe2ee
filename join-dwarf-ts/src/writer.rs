//! Deterministic disk writers for join-dwarf-ts outputs.

use std::path::Path;

use align_common::json::to_json_string;

use crate::error::JoinError;
use crate::schema::{AlignmentPairsOutput, AlignmentReport};

fn write_string(path: &Path, contents: &str) -> Result<(), JoinError> {
    std::fs::write(path, contents).map_err(JoinError::from)
}

pub fn write_pairs(path: &Path, pairs: &AlignmentPairsOutput) -> Result<(), JoinError> {
    let rendered = to_json_string(pairs)?;
    write_string(path, &rendered)
}

pub fn write_report(path: &Path, report: &AlignmentReport) -> Result<(), JoinError> {
    let rendered = to_json_string(report)?;
    write_string(path, &rendered)
}
