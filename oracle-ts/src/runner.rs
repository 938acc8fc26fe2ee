//! Top-level orchestration for the oracle-ts stage (C5-C7): parse each
//! translation unit, gate it, index its functions and their structural
//! nodes, judge each function, and produce in-memory outputs.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::OracleTsError;
use crate::function_index::index_functions;
use crate::node_index::index_structural_nodes;
use crate::policy::{gate_tu, judge_function, TsProfile, Verdict};
use crate::schema::{
    ExtractionRecipe, ExtractionRecipesOutput, FunctionCounts, OracleTsFunctions, OracleTsReport,
    ParseErrorRecord, SpanRecord, TsFunctionRecord, TuParseReport,
};
use crate::ts_parser::parse_tu;

fn now_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.to_string()
}

/// Runs the full oracle-ts pipeline (C5-C7) against a set of translation
/// units (already-preprocessed `.i` files).
pub fn run_oracle_ts(
    tu_paths: &[String],
    profile: &TsProfile,
) -> Result<(OracleTsReport, OracleTsFunctions, ExtractionRecipesOutput), OracleTsError> {
    let profile_id = profile.profile_id();

    let mut tu_reports = Vec::new();
    let mut all_functions = Vec::new();
    let mut recipes = Vec::new();
    let mut counts = FunctionCounts::default();

    for tu_path in tu_paths {
        tracing::info!(tu_path, "oracle-ts: parsing translation unit");
        let parse_result = parse_tu(tu_path)?;
        let (tu_verdict, tu_reasons) = gate_tu(&parse_result);

        tu_reports.push(TuParseReport {
            tu_path: tu_path.clone(),
            tu_hash: parse_result.tu_hash.clone(),
            parser: parse_result.parser_version.clone(),
            parse_status: parse_result.parse_status.as_str().to_string(),
            parse_errors: parse_result.parse_errors.iter().map(ParseErrorRecord::from).collect(),
            verdict: tu_verdict.as_str().to_string(),
            reasons: tu_reasons.iter().map(|s| s.to_string()).collect(),
        });

        if tu_verdict == Verdict::Reject {
            tracing::warn!(tu_path, ?tu_reasons, "oracle-ts: translation unit rejected, skipping function extraction");
            continue;
        }

        let source = &parse_result.source_bytes;
        let root = parse_result.root();
        let found = index_functions(root, source, tu_path);

        let mut names = HashSet::new();
        let mut duplicates = HashSet::new();
        for (_, entry) in &found {
            if let Some(name) = &entry.name {
                if !names.insert(name.clone()) {
                    duplicates.insert(name.clone());
                }
            }
        }

        for (node, entry) in &found {
            let structural_nodes =
                index_structural_nodes(*node, source, profile.deep_nesting_threshold);
            let (verdict, reasons) =
                judge_function(entry, &duplicates, &structural_nodes, *node, source);

            counts.total += 1;
            match verdict {
                Verdict::Accept => counts.accept += 1,
                Verdict::Warn => counts.warn += 1,
                Verdict::Reject => counts.reject += 1,
            }

            if verdict != Verdict::Reject {
                recipes.push(ExtractionRecipe {
                    function_name: entry.name.clone(),
                    ts_func_id: entry.ts_func_id.clone(),
                    tu_path: tu_path.clone(),
                    function_only_span: SpanRecord {
                        start_byte: entry.start_byte,
                        end_byte: entry.end_byte,
                        start_line: entry.start_line,
                        end_line: entry.end_line,
                    },
                    function_with_file_preamble_span: SpanRecord {
                        start_byte: entry.preamble_span.start_byte,
                        end_byte: entry.end_byte,
                        start_line: entry.preamble_span.start_line,
                        end_line: entry.end_line,
                    },
                });
            }

            all_functions.push(TsFunctionRecord::build(
                tu_path,
                entry,
                verdict,
                &reasons,
                structural_nodes,
            ));
        }
    }

    all_functions.sort_by(|a, b| a.ts_func_id.cmp(&b.ts_func_id));
    recipes.sort_by(|a, b| a.ts_func_id.cmp(&b.ts_func_id));

    let report = OracleTsReport {
        schema_version: crate::schema::SCHEMA_VERSION.to_string(),
        profile_id: profile_id.clone(),
        tu_reports,
        function_counts: counts,
        timestamp: now_timestamp(),
    };
    let functions = OracleTsFunctions {
        schema_version: crate::schema::SCHEMA_VERSION.to_string(),
        profile_id: profile_id.clone(),
        functions: all_functions,
    };
    let recipes_output = ExtractionRecipesOutput {
        schema_version: crate::schema::SCHEMA_VERSION.to_string(),
        profile_id,
        recipes,
    };

    Ok((report, functions, recipes_output))
}
