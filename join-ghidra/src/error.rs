use std::error::Error as StdError;
use std::fmt;

/// Error kinds for the address join (C10-C13). Tier-1 input-structural
/// failures per `spec.md` §7: receipt missing an artifact, SHA-256 mismatch
/// across sources, or malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhidraJoinErrorKind {
    Io,
    Json,
    ArtifactNotInReceipt,
    ShaMismatch,
}

impl fmt::Display for GhidraJoinErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            GhidraJoinErrorKind::Io => "failed to read join-ghidra input",
            GhidraJoinErrorKind::Json => "failed to parse join-ghidra input JSON",
            GhidraJoinErrorKind::ArtifactNotInReceipt => {
                "target artifact SHA-256 not found in build receipt"
            }
            GhidraJoinErrorKind::ShaMismatch => "SHA-256 mismatch across join sources",
        };
        f.write_str(msg)
    }
}

#[derive(Debug)]
pub struct GhidraJoinError {
    kind: GhidraJoinErrorKind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl GhidraJoinError {
    pub fn new<E>(kind: GhidraJoinErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        GhidraJoinError { kind, source: Some(source.into()) }
    }

    pub fn bare(kind: GhidraJoinErrorKind) -> Self {
        GhidraJoinError { kind, source: None }
    }

    pub fn kind(&self) -> GhidraJoinErrorKind {
        self.kind
    }
}

impl fmt::Display for GhidraJoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl StdError for GhidraJoinError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<std::io::Error> for GhidraJoinError {
    fn from(err: std::io::Error) -> Self {
        GhidraJoinError::new(GhidraJoinErrorKind::Io, err)
    }
}

impl From<serde_json::Error> for GhidraJoinError {
    fn from(err: serde_json::Error) -> Self {
        GhidraJoinError::new(GhidraJoinErrorKind::Json, err)
    }
}
