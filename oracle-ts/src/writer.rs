//! Deterministic disk writers for oracle-ts outputs.

use std::path::Path;

use align_common::json::to_json_string;

use crate::error::{OracleTsError, OracleTsErrorKind};
use crate::schema::{ExtractionRecipesOutput, OracleTsFunctions, OracleTsReport};

fn write_string(path: &Path, contents: &str) -> Result<(), OracleTsError> {
    std::fs::write(path, contents).map_err(OracleTsError::from)
}

pub fn write_report(path: &Path, report: &OracleTsReport) -> Result<(), OracleTsError> {
    let rendered = to_json_string(report)
        .map_err(|e| OracleTsError::new(OracleTsErrorKind::Io, e))?;
    write_string(path, &rendered)
}

pub fn write_functions(path: &Path, functions: &OracleTsFunctions) -> Result<(), OracleTsError> {
    let rendered = to_json_string(functions)
        .map_err(|e| OracleTsError::new(OracleTsErrorKind::Io, e))?;
    write_string(path, &rendered)
}

pub fn write_recipes(path: &Path, recipes: &ExtractionRecipesOutput) -> Result<(), OracleTsError> {
    let rendered = to_json_string(recipes)
        .map_err(|e| OracleTsError::new(OracleTsErrorKind::Io, e))?;
    write_string(path, &rendered)
}
