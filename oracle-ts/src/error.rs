use std::error::Error as StdError;
use std::fmt;

/// Error kinds for the tree-sitter syntactic index (C5-C7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleTsErrorKind {
    Io,
    ParserInit,
}

impl fmt::Display for OracleTsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            OracleTsErrorKind::Io => "failed to read translation unit",
            OracleTsErrorKind::ParserInit => "failed to initialize tree-sitter C parser",
        };
        f.write_str(msg)
    }
}

#[derive(Debug)]
pub struct OracleTsError {
    kind: OracleTsErrorKind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl OracleTsError {
    pub fn new<E>(kind: OracleTsErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        OracleTsError {
            kind,
            source: Some(source.into()),
        }
    }

    pub fn bare(kind: OracleTsErrorKind) -> Self {
        OracleTsError { kind, source: None }
    }

    pub fn kind(&self) -> OracleTsErrorKind {
        self.kind
    }
}

impl fmt::Display for OracleTsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl StdError for OracleTsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<std::io::Error> for OracleTsError {
    fn from(err: std::io::Error) -> Self {
        OracleTsError::new(OracleTsErrorKind::Io, err)
    }
}
