//! Tree-sitter C parser wrapper (C5).
//!
//! Holds a single process-wide `tree_sitter::Parser` behind a `Mutex`, as
//! `SPEC_FULL.md` §4.5-4.7 requires: the parser is reused across TUs within
//! a run but must never be shared across concurrent runs. Since a single run
//! is single-threaded (§5), ordinary interior mutability is sufficient here.

use std::sync::Mutex;

use once_cell::sync::Lazy;
use tree_sitter::{Node, Parser, Tree};

use align_common::hash::sha256_bytes;

use crate::error::{OracleTsError, OracleTsErrorKind};

static PARSER: Lazy<Mutex<Parser>> = Lazy::new(|| {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_c::LANGUAGE.into())
        .expect("tree-sitter-c grammar is ABI-compatible with tree-sitter");
    Mutex::new(parser)
});

/// Runtime + grammar identity, for provenance in parse reports.
pub const PARSER_VERSION: &str = concat!(
    "tree-sitter==",
    "0.22.6",
    "; tree-sitter-c==",
    "0.21.4"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 0-based line.
    pub line: u32,
    /// 0-based column.
    pub column: u32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Ok,
    Error,
}

impl ParseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseStatus::Ok => "OK",
            ParseStatus::Error => "ERROR",
        }
    }
}

/// Result of parsing a single translation unit. Owns both the concrete
/// syntax tree and the raw bytes it was parsed from, so downstream indexers
/// can borrow `Node`s against `source_bytes` for the lifetime of this value.
pub struct ParseResult {
    pub tree: Tree,
    pub source_bytes: Vec<u8>,
    pub tu_path: String,
    pub tu_hash: String,
    pub parser_version: String,
    pub parse_status: ParseStatus,
    pub parse_errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

fn collect_errors(node: Node<'_>, errors: &mut Vec<ParseError>) {
    if node.kind() == "ERROR" || node.is_missing() {
        let point = node.start_position();
        let message = if node.is_missing() {
            format!("MISSING({})", node.kind())
        } else {
            "ERROR".to_string()
        };
        errors.push(ParseError {
            line: point.row as u32,
            column: point.column as u32,
            message,
        });
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_errors(child, errors);
    }
}

/// Parses a preprocessed C translation unit from bytes already read into
/// memory (so callers control I/O, matching the other oracle's split
/// between structural reading and parsing).
pub fn parse_tu_bytes(tu_path: &str, source_bytes: Vec<u8>) -> Result<ParseResult, OracleTsError> {
    let tu_hash = sha256_bytes(&source_bytes);

    let tree = {
        let mut parser = PARSER.lock().expect("tree-sitter parser mutex poisoned");
        parser
            .parse(&source_bytes, None)
            .ok_or_else(|| OracleTsError::bare(OracleTsErrorKind::ParserInit))?
    };

    let mut parse_errors = Vec::new();
    collect_errors(tree.root_node(), &mut parse_errors);
    let parse_status = if parse_errors.is_empty() {
        ParseStatus::Ok
    } else {
        ParseStatus::Error
    };

    Ok(ParseResult {
        tree,
        source_bytes,
        tu_path: tu_path.to_string(),
        tu_hash,
        parser_version: PARSER_VERSION.to_string(),
        parse_status,
        parse_errors,
    })
}

/// Reads `path` from disk and parses it.
pub fn parse_tu(path: &str) -> Result<ParseResult, OracleTsError> {
    let bytes = std::fs::read(path)?;
    parse_tu_bytes(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clean_source() {
        let result = parse_tu_bytes("t.i", b"int add(int a, int b) { return a + b; }".to_vec()).unwrap();
        assert_eq!(result.parse_status, ParseStatus::Ok);
        assert!(result.parse_errors.is_empty());
    }

    #[test]
    fn flags_syntax_errors() {
        let result = parse_tu_bytes("t.i", b"int add(int a, int b) { return a + ; }".to_vec()).unwrap();
        assert_eq!(result.parse_status, ParseStatus::Error);
        assert!(!result.parse_errors.is_empty());
    }
}
