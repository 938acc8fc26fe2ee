//! TU-level gate and per-function syntactic judge (C7).
//!
//! All verdicts here are strictly syntactic, derived from parse-tree
//! properties — no semantic inference.

use std::collections::HashSet;

use tree_sitter::Node;

use crate::function_index::TsFunctionEntry;
use crate::node_index::StructuralNode;
use crate::ts_parser::{ParseResult, ParseStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Warn,
    Reject,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Accept => "ACCEPT",
            Verdict::Warn => "WARN",
            Verdict::Reject => "REJECT",
        }
    }
}

/// TU-level gate. REJECT only when the parse tree's root has zero children
/// and errors were found (the TU is entirely unparseable); any other parse
/// errors produce WARN while leaving the TU usable.
pub fn gate_tu(parse_result: &ParseResult) -> (Verdict, Vec<&'static str>) {
    if parse_result.parse_status == ParseStatus::Error {
        if parse_result.root().child_count() == 0 {
            return (Verdict::Reject, vec!["TU_PARSE_ERROR"]);
        }
        return (Verdict::Warn, vec!["TU_PARSE_ERROR"]);
    }
    (Verdict::Accept, Vec::new())
}

const NONSTANDARD_MARKERS: &[&str] = &[
    "__attribute__",
    "__asm__",
    "__asm",
    "__extension__",
    "__typeof__",
    "__builtin_",
    "_Pragma",
];

fn has_nonstandard_extension(text: &str) -> bool {
    NONSTANDARD_MARKERS.iter().any(|m| text.contains(m))
}

/// Anonymous struct/union/enum: a `*_specifier` with a body but no `name`
/// field. Scoped to the function's own subtree so sibling functions don't
/// produce false positives.
fn has_anonymous_aggregate(node: Node<'_>) -> bool {
    if matches!(node.kind(), "struct_specifier" | "union_specifier" | "enum_specifier")
        && node.child_by_field_name("name").is_none()
        && node.child_by_field_name("body").is_some()
    {
        return true;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).any(has_anonymous_aggregate)
}

/// Per-function verdict.
pub fn judge_function(
    func: &TsFunctionEntry,
    duplicate_names: &HashSet<String>,
    structural_nodes: &[StructuralNode],
    func_node: Node<'_>,
    source: &[u8],
) -> (Verdict, Vec<&'static str>) {
    if func.start_byte >= func.end_byte {
        return (Verdict::Reject, vec!["INVALID_SPAN"]);
    }
    let Some(name) = &func.name else {
        return (Verdict::Reject, vec!["MISSING_FUNCTION_NAME"]);
    };

    let mut reasons = Vec::new();
    if duplicate_names.contains(name) {
        reasons.push("DUPLICATE_FUNCTION_NAME");
    }
    if structural_nodes.iter().any(|n| n.uncertainty_flags.iter().any(|f| f == "DEEP_NESTING")) {
        reasons.push("DEEP_NESTING");
    }
    if has_anonymous_aggregate(func_node) {
        reasons.push("ANONYMOUS_AGGREGATE_PRESENT");
    }
    let func_text = String::from_utf8_lossy(&source[func.start_byte..func.end_byte]);
    if has_nonstandard_extension(&func_text) {
        reasons.push("NONSTANDARD_EXTENSION_PATTERN");
    }

    if reasons.is_empty() {
        (Verdict::Accept, reasons)
    } else {
        (Verdict::Warn, reasons)
    }
}
