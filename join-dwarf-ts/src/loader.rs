//! Loads oracle-dwarf outputs, oracle-ts outputs, and `.i` translation units
//! from disk, enforcing the schema version floors `spec.md` §4.14 requires.

use std::collections::BTreeMap;
use std::path::Path;

use oracle_dwarf::schema::{OracleFunctionsOutput, OracleReport};
use oracle_ts::schema::{OracleTsFunctions, OracleTsReport};

use crate::error::{JoinError, JoinErrorKind};

const DWARF_MIN_SCHEMA: (u32, u32) = (0, 2);
const TS_MIN_SCHEMA: (u32, u32) = (0, 1);

fn parse_major_minor(version: &str) -> (u32, u32) {
    let mut parts = version.split('.');
    let major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (major, minor)
}

fn check_version(component: &str, version: &str, floor: (u32, u32)) -> Result<(), JoinError> {
    if parse_major_minor(version) < floor {
        return Err(JoinError::new(
            JoinErrorKind::SchemaTooOld,
            format!(
                "{component} schema {version} is below the required floor {}.{}",
                floor.0, floor.1
            ),
        ));
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, JoinError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn load_dwarf_outputs(
    report_path: &Path,
    functions_path: &Path,
) -> Result<(OracleReport, OracleFunctionsOutput), JoinError> {
    let report: OracleReport = read_json(report_path)?;
    let functions: OracleFunctionsOutput = read_json(functions_path)?;
    check_version("oracle-dwarf", &report.schema_version, DWARF_MIN_SCHEMA)?;
    check_version("oracle-dwarf", &functions.schema_version, DWARF_MIN_SCHEMA)?;
    Ok((report, functions))
}

pub fn load_ts_outputs(
    report_path: &Path,
    functions_path: &Path,
) -> Result<(OracleTsReport, OracleTsFunctions), JoinError> {
    let report: OracleTsReport = read_json(report_path)?;
    let functions: OracleTsFunctions = read_json(functions_path)?;
    check_version("oracle-ts", &report.schema_version, TS_MIN_SCHEMA)?;
    check_version("oracle-ts", &functions.schema_version, TS_MIN_SCHEMA)?;
    Ok((report, functions))
}

/// Globs every `.i` file under `dir` (recursively), keyed by filename as
/// the canonical `tu_path`, sorted for deterministic iteration order.
pub fn load_i_files(dir: &Path) -> Result<BTreeMap<String, String>, JoinError> {
    let mut paths: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().map(|e| e == "i").unwrap_or(false))
        .map(|entry| entry.path().to_path_buf())
        .collect();
    paths.sort();

    let mut out = BTreeMap::new();
    for path in paths {
        let tu_path = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let bytes = std::fs::read(&path)?;
        out.insert(tu_path, String::from_utf8_lossy(&bytes).into_owned());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_floor_accepts_equal_and_above() {
        assert!(check_version("x", "0.2.0", (0, 2)).is_ok());
        assert!(check_version("x", "0.3.0", (0, 2)).is_ok());
        assert!(check_version("x", "1.0.0", (0, 2)).is_ok());
    }

    #[test]
    fn version_floor_rejects_below() {
        assert!(check_version("x", "0.1.0", (0, 2)).is_err());
    }
}
