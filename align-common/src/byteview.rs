//! A small memory-mapped byte buffer, modeled after the mmap-backed byte
//! views used throughout the wider debuginfo tooling ecosystem.

use std::borrow::Cow;
use std::fs::File;
use std::io;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;

#[derive(Debug)]
enum Backing {
    Buf(Cow<'static, [u8]>),
    Mmap(Mmap),
}

impl Deref for Backing {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        match self {
            Backing::Buf(buf) => buf,
            Backing::Mmap(mmap) => mmap,
        }
    }
}

/// A cheaply cloneable handle to a byte buffer, backed either by a memory
/// mapped file or an owned `Vec<u8>`.
#[derive(Clone, Debug)]
pub struct ByteData {
    backing: Arc<Backing>,
}

impl ByteData {
    /// Memory maps the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let backing = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => Backing::Mmap(mmap),
            Err(err) if err.kind() == io::ErrorKind::InvalidInput => {
                Backing::Buf(Cow::Borrowed(&[][..]))
            }
            Err(err) => return Err(err),
        };
        Ok(ByteData {
            backing: Arc::new(backing),
        })
    }

    /// Wraps an owned buffer without touching the filesystem.
    pub fn from_vec(buffer: Vec<u8>) -> Self {
        ByteData {
            backing: Arc::new(Backing::Buf(Cow::Owned(buffer))),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.backing
    }
}

impl Deref for ByteData {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for ByteData {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn maps_a_real_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        let view = ByteData::open(file.path()).unwrap();
        assert_eq!(view.as_slice(), b"hello");
    }

    #[test]
    fn wraps_a_vec() {
        let view = ByteData::from_vec(vec![1, 2, 3]);
        assert_eq!(view.as_slice(), &[1, 2, 3]);
    }
}
