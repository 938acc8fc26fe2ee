use std::error::Error as StdError;
use std::fmt;

/// Error kinds for the ELF/DWARF reading stage (C1-C3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleDwarfErrorKind {
    NotElf,
    InvalidElf,
    InvalidDwarf,
    MissingLineProgram,
}

impl fmt::Display for OracleDwarfErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            OracleDwarfErrorKind::NotElf => "not an ELF file",
            OracleDwarfErrorKind::InvalidElf => "malformed ELF file",
            OracleDwarfErrorKind::InvalidDwarf => "malformed DWARF data",
            OracleDwarfErrorKind::MissingLineProgram => "compilation unit has no line program",
        };
        f.write_str(msg)
    }
}

/// An error produced while reading an ELF binary or its DWARF debug info.
#[derive(Debug)]
pub struct OracleDwarfError {
    kind: OracleDwarfErrorKind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl OracleDwarfError {
    pub fn new<E>(kind: OracleDwarfErrorKind, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        OracleDwarfError {
            kind,
            source: Some(source.into()),
        }
    }

    pub fn bare(kind: OracleDwarfErrorKind) -> Self {
        OracleDwarfError { kind, source: None }
    }

    pub fn kind(&self) -> OracleDwarfErrorKind {
        self.kind
    }
}

impl fmt::Display for OracleDwarfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl StdError for OracleDwarfError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<goblin::error::Error> for OracleDwarfError {
    fn from(err: goblin::error::Error) -> Self {
        OracleDwarfError::new(OracleDwarfErrorKind::InvalidElf, err)
    }
}

impl From<gimli::Error> for OracleDwarfError {
    fn from(err: gimli::Error) -> Self {
        OracleDwarfError::new(OracleDwarfErrorKind::InvalidDwarf, err)
    }
}

impl From<std::io::Error> for OracleDwarfError {
    fn from(err: std::io::Error) -> Self {
        OracleDwarfError::new(OracleDwarfErrorKind::InvalidElf, err)
    }
}
