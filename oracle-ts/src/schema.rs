//! Typed output records for the oracle-ts stage (C13, local half).
//!
//! Three outputs: `oracle_ts_report.json` (TU-level), `oracle_ts_functions.json`
//! (per-function syntactic index with structural nodes), and
//! `extraction_recipes.json` (deterministic per-function extraction spans).

use serde::{Deserialize, Serialize};

use crate::function_index::{SpanInfo, TsFunctionEntry};
use crate::node_index::StructuralNode;
use crate::ts_parser::ParseError;

pub const SCHEMA_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpanRecord {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_line: u32,
    pub end_line: u32,
}

impl From<SpanInfo> for SpanRecord {
    fn from(s: SpanInfo) -> Self {
        SpanRecord {
            start_byte: s.start_byte,
            end_byte: s.end_byte,
            start_line: s.start_line,
            end_line: s.end_line,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseErrorRecord {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl From<&ParseError> for ParseErrorRecord {
    fn from(e: &ParseError) -> Self {
        ParseErrorRecord {
            line: e.line,
            column: e.column,
            message: e.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TuParseReport {
    pub tu_path: String,
    pub tu_hash: String,
    pub parser: String,
    pub parse_status: String,
    pub parse_errors: Vec<ParseErrorRecord>,
    pub verdict: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FunctionCounts {
    pub total: u64,
    pub accept: u64,
    pub warn: u64,
    pub reject: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleTsReport {
    pub schema_version: String,
    pub profile_id: String,
    pub tu_reports: Vec<TuParseReport>,
    pub function_counts: FunctionCounts,
    /// Seconds since the Unix epoch; the sole non-deterministic field.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TsFunctionRecord {
    pub name: Option<String>,
    pub ts_func_id: String,
    pub span_id: String,
    pub context_hash: String,
    pub node_hash_raw: String,
    pub tu_path: String,

    pub start_line: u32,
    pub end_line: u32,
    pub start_byte: usize,
    pub end_byte: usize,

    pub signature_span: SpanRecord,
    pub body_span: SpanRecord,
    pub preamble_span: SpanRecord,

    pub verdict: String,
    pub reasons: Vec<String>,

    pub structural_nodes: Vec<StructuralNode>,
}

impl TsFunctionRecord {
    pub fn build(
        tu_path: &str,
        entry: &TsFunctionEntry,
        verdict: crate::policy::Verdict,
        reasons: &[&'static str],
        structural_nodes: Vec<StructuralNode>,
    ) -> Self {
        TsFunctionRecord {
            name: entry.name.clone(),
            ts_func_id: entry.ts_func_id.clone(),
            span_id: entry.span_id.clone(),
            context_hash: entry.context_hash.clone(),
            node_hash_raw: entry.node_hash_raw.clone(),
            tu_path: tu_path.to_string(),
            start_line: entry.start_line,
            end_line: entry.end_line,
            start_byte: entry.start_byte,
            end_byte: entry.end_byte,
            signature_span: entry.signature_span.into(),
            body_span: entry.body_span.into(),
            preamble_span: entry.preamble_span.into(),
            verdict: verdict.as_str().to_string(),
            reasons: reasons.iter().map(|s| s.to_string()).collect(),
            structural_nodes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleTsFunctions {
    pub schema_version: String,
    pub profile_id: String,
    pub functions: Vec<TsFunctionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionRecipe {
    pub function_name: Option<String>,
    pub ts_func_id: String,
    pub tu_path: String,
    pub function_only_span: SpanRecord,
    pub function_with_file_preamble_span: SpanRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionRecipesOutput {
    pub schema_version: String,
    pub profile_id: String,
    pub recipes: Vec<ExtractionRecipe>,
}
