//! Structural node index (C6): control-flow-relevant nodes within a function
//! body, walked against a closed allowlist per `spec.md` §3.
//!
//! Extends the original 6-kind allowlist with `do_statement`,
//! `goto_statement`, and `labeled_statement`, per the spec's 9-kind set.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::normalizer::raw_hash;

pub const STRUCTURAL_NODE_TYPES: &[&str] = &[
    "compound_statement",
    "if_statement",
    "for_statement",
    "while_statement",
    "do_statement",
    "switch_statement",
    "return_statement",
    "goto_statement",
    "labeled_statement",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuralNode {
    pub node_type: String,
    /// 0-based.
    pub start_line: u32,
    /// 0-based.
    pub end_line: u32,
    pub start_byte: usize,
    pub end_byte: usize,
    pub node_hash_raw: String,
    pub depth: u32,
    pub uncertainty_flags: Vec<String>,
}

/// Walks a `function_definition` subtree and collects allowlisted nodes,
/// flagging `DEEP_NESTING` at or beyond `deep_nesting_threshold`.
pub fn index_structural_nodes(
    func_node: Node<'_>,
    source: &[u8],
    deep_nesting_threshold: u32,
) -> Vec<StructuralNode> {
    let mut out = Vec::new();
    walk(func_node, source, 0, deep_nesting_threshold, &mut out);
    out
}

fn walk(node: Node<'_>, source: &[u8], depth: u32, threshold: u32, out: &mut Vec<StructuralNode>) {
    if STRUCTURAL_NODE_TYPES.contains(&node.kind()) {
        let text = &source[node.start_byte()..node.end_byte()];
        let mut flags = Vec::new();
        if depth >= threshold {
            flags.push("DEEP_NESTING".to_string());
        }
        out.push(StructuralNode {
            node_type: node.kind().to_string(),
            start_line: node.start_position().row as u32,
            end_line: node.end_position().row as u32,
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            node_hash_raw: raw_hash(text),
            depth,
            uncertainty_flags: flags,
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, source, depth + 1, threshold, out);
    }
}
