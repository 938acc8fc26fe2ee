//! Function index (C6): extract `function_definition` spans from a parsed
//! translation unit, with stable content-hash identities.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::normalizer::{normalize_and_hash, raw_hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanInfo {
    pub start_byte: usize,
    pub end_byte: usize,
    /// 0-based.
    pub start_line: u32,
    /// 0-based.
    pub end_line: u32,
}

#[derive(Debug, Clone)]
pub struct TsFunctionEntry {
    pub name: Option<String>,

    pub start_line: u32,
    pub end_line: u32,
    pub start_byte: usize,
    pub end_byte: usize,

    pub signature_span: SpanInfo,
    pub body_span: SpanInfo,
    pub preamble_span: SpanInfo,

    /// `{tu_path}:{start_byte}:{end_byte}`.
    pub span_id: String,
    /// SHA-256 of the normalized function text.
    pub context_hash: String,
    /// `{span_id}:{context_hash}`.
    pub ts_func_id: String,
    /// SHA-256 of the raw function text.
    pub node_hash_raw: String,
}

/// Recursively drills into a declarator chain to find the innermost
/// identifier, following the same grammar shape the function-definition
/// builder walks: `function_declarator -> pointer_declarator ->
/// parenthesized_declarator -> array_declarator -> identifier`.
fn find_identifier_in_declarator(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "identifier" => Some(node.utf8_text(source).ok()?.to_string()),
        "function_declarator" | "pointer_declarator" | "array_declarator" => node
            .child_by_field_name("declarator")
            .and_then(|inner| find_identifier_in_declarator(inner, source)),
        "parenthesized_declarator" => {
            let mut cursor = node.walk();
            node.children(&mut cursor)
                .find_map(|child| find_identifier_in_declarator(child, source))
        }
        _ => None,
    }
}

fn extract_function_name(node: Node<'_>, source: &[u8]) -> Option<String> {
    let declarator = node.child_by_field_name("declarator")?;
    find_identifier_in_declarator(declarator, source)
}

/// Extracts one [`TsFunctionEntry`] (plus its underlying CST node, for
/// callers that also need structural/verdict analysis) per top-level
/// `function_definition` child of `root`.
pub fn index_functions<'a>(
    root: Node<'a>,
    source: &[u8],
    tu_path: &str,
) -> Vec<(Node<'a>, TsFunctionEntry)> {
    let mut out = Vec::new();
    let mut cursor = root.walk();
    for node in root.children(&mut cursor) {
        if node.kind() != "function_definition" {
            continue;
        }

        let name = extract_function_name(node, source);
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();
        let start_line = node.start_position().row as u32;
        let end_line = node.end_position().row as u32;

        let body_node = node.child_by_field_name("body");
        let (signature_span, body_span) = match body_node {
            Some(body) if body.kind() == "compound_statement" => (
                SpanInfo {
                    start_byte,
                    end_byte: body.start_byte(),
                    start_line,
                    end_line: body.start_position().row as u32,
                },
                SpanInfo {
                    start_byte: body.start_byte(),
                    end_byte: body.end_byte(),
                    start_line: body.start_position().row as u32,
                    end_line: body.end_position().row as u32,
                },
            ),
            _ => (
                SpanInfo { start_byte, end_byte, start_line, end_line },
                SpanInfo {
                    start_byte: end_byte,
                    end_byte,
                    start_line: end_line,
                    end_line,
                },
            ),
        };

        let preamble_span = SpanInfo {
            start_byte: 0,
            end_byte: start_byte,
            start_line: 0,
            end_line: start_line,
        };

        let func_text = &source[start_byte..end_byte];
        let context_hash = normalize_and_hash(func_text);
        let node_hash_raw = raw_hash(func_text);
        let span_id = format!("{tu_path}:{start_byte}:{end_byte}");
        let ts_func_id = format!("{span_id}:{context_hash}");

        out.push((
            node,
            TsFunctionEntry {
                name,
                start_line,
                end_line,
                start_byte,
                end_byte,
                signature_span,
                body_span,
                preamble_span,
                span_id,
                context_hash,
                ts_func_id,
                node_hash_raw,
            },
        ));
    }
    out
}
