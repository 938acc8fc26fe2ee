//! Deterministic disk writers for oracle-dwarf outputs.

use std::path::Path;

use align_common::json::to_json_string;

use crate::error::{OracleDwarfError, OracleDwarfErrorKind};
use crate::schema::{OracleFunctionsOutput, OracleReport};

fn write_string(path: &Path, contents: &str) -> Result<(), OracleDwarfError> {
    std::fs::write(path, contents)
        .map_err(|e| OracleDwarfError::new(OracleDwarfErrorKind::InvalidElf, e))
}

pub fn write_report(path: &Path, report: &OracleReport) -> Result<(), OracleDwarfError> {
    let rendered = to_json_string(report)
        .map_err(|e| OracleDwarfError::new(OracleDwarfErrorKind::InvalidDwarf, e))?;
    write_string(path, &rendered)
}

pub fn write_functions(path: &Path, functions: &OracleFunctionsOutput) -> Result<(), OracleDwarfError> {
    let rendered = to_json_string(functions)
        .map_err(|e| OracleDwarfError::new(OracleDwarfErrorKind::InvalidDwarf, e))?;
    write_string(path, &rendered)
}
