//! Index file access and output buffering
//!
//! Index files are memory-mapped read-only and walked with a small
//! word cursor that understands the endianness marker every index file
//! starts with.

use crate::core::error::{IndexError, IndexResult};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// Default buffer size for output (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Memory-mapped, read-only file
pub struct MappedFile {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFile {
    /// Map a file; a missing file is reported as [`IndexError::FileNotFound`]
    pub fn open<P: AsRef<Path>>(path: P) -> IndexResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => IndexError::FileNotFound(path.to_path_buf()),
            _ => IndexError::Io(e),
        })?;
        // SAFETY: index files are treated as immutable for the whole run
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap,
            path: path.to_path_buf(),
        })
    }

    /// Get the entire file content as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get file size
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Word cursor over the whole file
    pub fn cursor(&self) -> WordCursor<'_> {
        WordCursor::new(&self.mmap, &self.path)
    }
}

/// Sequential reader of 32-bit words
///
/// Words are stored in the byte order of the machine that wrote the
/// file. The first word is always `1`; reading it any other way means
/// every following word must be byte-swapped.
pub struct WordCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    swap: bool,
    path: &'a Path,
}

impl<'a> WordCursor<'a> {
    pub fn new(bytes: &'a [u8], path: &'a Path) -> Self {
        Self {
            bytes,
            pos: 0,
            swap: false,
            path,
        }
    }

    /// Consume the endianness marker and remember the byte order
    pub fn read_endianness(&mut self) -> IndexResult<()> {
        let one = self.read_u32()?;
        if one == 1 {
            self.swap = false;
        } else if one.swap_bytes() == 1 {
            self.swap = true;
        } else {
            return Err(IndexError::InvalidHeader {
                path: self.path.to_path_buf(),
                message: format!("endianness marker is {:#010x}, expected 1", one),
            });
        }
        Ok(())
    }

    /// Whether words are byte-swapped relative to this machine
    pub fn is_swapped(&self) -> bool {
        self.swap
    }

    fn take(&mut self, n: usize) -> IndexResult<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(self.truncated(n as u64)),
        }
    }

    fn truncated(&self, n: u64) -> IndexError {
        IndexError::Truncated {
            path: self.path.to_path_buf(),
            needed: self.pos as u64 + n,
            actual: self.bytes.len() as u64,
        }
    }

    pub fn read_u32(&mut self) -> IndexResult<u32> {
        let raw = self.take(4)?;
        let word = u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]);
        Ok(if self.swap { word.swap_bytes() } else { word })
    }

    pub fn read_i32(&mut self) -> IndexResult<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_u8(&mut self) -> IndexResult<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read `count` words
    pub fn read_u32_vec(&mut self, count: usize) -> IndexResult<Vec<u32>> {
        let needed = (count as u64) * 4;
        if self.pos as u64 + needed > self.bytes.len() as u64 {
            return Err(self.truncated(needed));
        }
        (0..count).map(|_| self.read_u32()).collect()
    }

    /// Skip `n` bytes
    pub fn skip(&mut self, n: u64) -> IndexResult<()> {
        let n = usize::try_from(n).map_err(|_| self.truncated(n))?;
        self.take(n).map(|_| ())
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

/// Append a suffix such as `.1.ebwt` to an index base path
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Buffered, locked standard output
pub fn stdout_writer() -> BufWriter<io::StdoutLock<'static>> {
    BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, io::stdout().lock())
}
