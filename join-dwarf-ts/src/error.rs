use std::error::Error as StdError;
use std::fmt;

/// Error kinds for the line-evidence join (C8-C9). These are tier-1
/// input-structural failures per `spec.md` §7: schema version floors not
/// met, malformed input JSON, or I/O failures reading `.i` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinErrorKind {
    Io,
    Json,
    SchemaTooOld,
}

impl fmt::Display for JoinErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            JoinErrorKind::Io => "failed to read join input",
            JoinErrorKind::Json => "failed to parse join input JSON",
            JoinErrorKind::SchemaTooOld => "input schema version below the required floor",
        };
        f.write_str(msg)
    }
}

#[derive(Debug)]
pub struct JoinError {
    kind: JoinErrorKind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl JoinError {
    pub fn new<E>(kind: JoinErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        JoinError { kind, source: Some(source.into()) }
    }

    pub fn bare(kind: JoinErrorKind) -> Self {
        JoinError { kind, source: None }
    }

    pub fn kind(&self) -> JoinErrorKind {
        self.kind
    }
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl StdError for JoinError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<std::io::Error> for JoinError {
    fn from(err: std::io::Error) -> Self {
        JoinError::new(JoinErrorKind::Io, err)
    }
}

impl From<serde_json::Error> for JoinError {
    fn from(err: serde_json::Error) -> Self {
        JoinError::new(JoinErrorKind::Json, err)
    }
}
