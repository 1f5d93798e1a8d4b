//! Packed reference store (`<base>.3.ebwt` + `<base>.4.ebwt`)
//!
//! `.3.ebwt` describes how each reference splits into ambiguous gaps
//! and unambiguous runs:
//!
//! ```text
//! one nRecords (off: u32, len: u32, first: u8) * nRecords
//! ```
//!
//! A record is `off` ambiguous positions followed by `len` bases; a
//! record with `first` set starts a new reference. `.4.ebwt` holds the
//! unambiguous bases of all records back to back, four per byte, low
//! bits first.

use crate::core::alphabet::N_CODE;
use crate::core::{IndexError, IndexResult, PackedReferenceStore};
use crate::core::io::{with_suffix, MappedFile};
use log::debug;
use std::path::Path;

/// Suffix of the record table
pub const RECORDS_SUFFIX: &str = ".3.ebwt";

/// Suffix of the packed bases
pub const PACKED_SUFFIX: &str = ".4.ebwt";

/// One gap + run entry of the record table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefRecord {
    /// Ambiguous positions before the run
    pub off: u32,
    /// Unambiguous bases in the run
    pub len: u32,
    /// Starts a new reference
    pub first: bool,
}

/// Records of one reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RefSpan {
    first_record: usize,
    end_record: usize,
    length: u64,
}

/// Reader for the packed reference store
pub struct BitPairReference {
    packed: MappedFile,
    records: Vec<RefRecord>,
    /// Unambiguous offset of each record's run
    record_starts: Vec<u64>,
    spans: Vec<RefSpan>,
    unambiguous: u64,
}

impl BitPairReference {
    /// Open `<base>.3.ebwt` and map `<base>.4.ebwt`
    pub fn open<P: AsRef<Path>>(base: P) -> IndexResult<Self> {
        let base = base.as_ref();
        let records_path = with_suffix(base, RECORDS_SUFFIX);
        let records_file = MappedFile::open(&records_path)?;
        let mut cursor = records_file.cursor();

        cursor.read_endianness()?;
        let count = cursor.read_u32()? as usize;
        let mut records = Vec::with_capacity(count.min(cursor.remaining().len() / 9));
        for _ in 0..count {
            records.push(RefRecord {
                off: cursor.read_u32()?,
                len: cursor.read_u32()?,
                first: cursor.read_u8()? != 0,
            });
        }

        let packed = MappedFile::open(with_suffix(base, PACKED_SUFFIX))?;
        let reference = Self::from_parts(&records_path, records, packed)?;
        debug!(
            "{}: {} records, {} references, {} unambiguous bases",
            records_path.display(),
            reference.records.len(),
            reference.spans.len(),
            reference.unambiguous
        );
        Ok(reference)
    }

    fn from_parts(
        records_path: &Path,
        records: Vec<RefRecord>,
        packed: MappedFile,
    ) -> IndexResult<Self> {
        if records.first().is_some_and(|r| !r.first) {
            return Err(IndexError::MissingFirstRecord(records_path.to_path_buf()));
        }

        let mut record_starts = Vec::with_capacity(records.len());
        let mut spans: Vec<RefSpan> = Vec::new();
        let mut unambiguous = 0u64;

        for (i, rec) in records.iter().enumerate() {
            if rec.first {
                if let Some(last) = spans.last_mut() {
                    last.end_record = i;
                }
                spans.push(RefSpan {
                    first_record: i,
                    end_record: records.len(),
                    length: 0,
                });
            }
            record_starts.push(unambiguous);
            unambiguous += rec.len as u64;
            if let Some(span) = spans.last_mut() {
                span.length += rec.off as u64 + rec.len as u64;
            }
        }

        let needed = unambiguous.div_ceil(4);
        if (packed.len() as u64) < needed {
            return Err(IndexError::Truncated {
                path: packed.path().to_path_buf(),
                needed,
                actual: packed.len() as u64,
            });
        }

        Ok(Self {
            packed,
            records,
            record_starts,
            spans,
            unambiguous,
        })
    }

    /// Length of a reference, gaps included
    pub fn ref_length(&self, reference: usize) -> Option<u64> {
        self.spans.get(reference).map(|s| s.length)
    }

    /// Total unambiguous bases in the store
    pub fn unambiguous_len(&self) -> u64 {
        self.unambiguous
    }

    pub fn records(&self) -> &[RefRecord] {
        &self.records
    }

    /// Code of the `pos`-th unambiguous base
    #[inline]
    pub fn unambiguous_code(&self, pos: u64) -> IndexResult<u8> {
        if pos >= self.unambiguous {
            return Err(IndexError::Unsupported(format!(
                "unambiguous position {} beyond {} stored bases",
                pos, self.unambiguous
            )));
        }
        let byte = self.packed.as_bytes()[(pos >> 2) as usize];
        Ok((byte >> ((pos & 3) << 1)) & 3)
    }
}

impl PackedReferenceStore for BitPairReference {
    fn num_references(&self) -> usize {
        self.spans.len()
    }

    fn get_stretch(
        &self,
        buf: &mut Vec<u8>,
        reference: usize,
        start: u64,
        len: usize,
    ) -> IndexResult<usize> {
        let span = self.spans.get(reference).ok_or_else(|| {
            IndexError::Unsupported(format!("no reference with index {}", reference))
        })?;
        let end = start + len as u64;
        if end > span.length {
            return Err(IndexError::StretchOutOfRange {
                reference,
                start,
                end,
                length: span.length,
            });
        }

        buf.clear();
        buf.resize(len, N_CODE);

        let mut text_pos = 0u64;
        for r in span.first_record..span.end_record {
            if text_pos >= end {
                break;
            }
            let rec = self.records[r];
            let run_start = text_pos + rec.off as u64;
            let run_end = run_start + rec.len as u64;
            let lo = run_start.max(start);
            let hi = run_end.min(end);
            for pos in lo..hi {
                let code = self.unambiguous_code(self.record_starts[r] + (pos - run_start))?;
                buf[(pos - start) as usize] = code;
            }
            text_pos = run_end;
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Write `.3`/`.4` files for the given records and unambiguous codes
    fn write_store(dir: &TempDir, records: &[(u32, u32, bool)], codes: &[u8]) -> std::path::PathBuf {
        let base = dir.path().join("idx");

        let mut three = Vec::new();
        three.extend_from_slice(&1u32.to_ne_bytes());
        three.extend_from_slice(&(records.len() as u32).to_ne_bytes());
        for &(off, len, first) in records {
            three.extend_from_slice(&off.to_ne_bytes());
            three.extend_from_slice(&len.to_ne_bytes());
            three.push(first as u8);
        }
        fs::write(with_suffix(&base, RECORDS_SUFFIX), three).unwrap();

        let mut four = vec![0u8; codes.len().div_ceil(4)];
        for (i, &c) in codes.iter().enumerate() {
            four[i >> 2] |= c << ((i & 3) << 1);
        }
        fs::write(with_suffix(&base, PACKED_SUFFIX), four).unwrap();
        base
    }

    #[test]
    fn test_open_and_stretch() {
        let dir = TempDir::new().unwrap();
        // ref0 = NNAC + NGT + NN ; ref1 = TTGCA
        let base = write_store(
            &dir,
            &[(2, 2, true), (1, 2, false), (2, 0, false), (0, 5, true)],
            &[0, 1, 2, 3, 3, 3, 2, 1, 0],
        );
        let store = BitPairReference::open(&base).unwrap();

        assert_eq!(store.num_references(), 2);
        assert_eq!(store.ref_length(0), Some(9));
        assert_eq!(store.ref_length(1), Some(5));
        assert_eq!(store.unambiguous_len(), 9);

        let mut buf = Vec::new();
        let off = store.get_stretch(&mut buf, 0, 0, 9).unwrap();
        assert_eq!(&buf[off..], &[4, 4, 0, 1, 4, 2, 3, 4, 4]);

        let off = store.get_stretch(&mut buf, 0, 3, 3).unwrap();
        assert_eq!(&buf[off..], &[1, 4, 2]);

        let off = store.get_stretch(&mut buf, 1, 1, 4).unwrap();
        assert_eq!(&buf[off..], &[3, 2, 1, 0]);
    }

    #[test]
    fn test_stretch_out_of_range() {
        let dir = TempDir::new().unwrap();
        let base = write_store(&dir, &[(0, 4, true)], &[0, 1, 2, 3]);
        let store = BitPairReference::open(&base).unwrap();
        let mut buf = Vec::new();
        assert!(matches!(
            store.get_stretch(&mut buf, 0, 2, 3),
            Err(IndexError::StretchOutOfRange { end: 5, length: 4, .. })
        ));
        assert!(store.get_stretch(&mut buf, 1, 0, 1).is_err());
    }

    #[test]
    fn test_missing_first_record() {
        let dir = TempDir::new().unwrap();
        let base = write_store(&dir, &[(0, 4, false)], &[0, 1, 2, 3]);
        assert!(matches!(
            BitPairReference::open(&base),
            Err(IndexError::MissingFirstRecord(_))
        ));
    }

    #[test]
    fn test_truncated_packed_file() {
        let dir = TempDir::new().unwrap();
        let base = write_store(&dir, &[(0, 9, true)], &[0; 4]);
        assert!(matches!(
            BitPairReference::open(&base),
            Err(IndexError::Truncated { needed: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_unambiguous_code_bounds() {
        let dir = TempDir::new().unwrap();
        let base = write_store(&dir, &[(0, 3, true)], &[3, 2, 1]);
        let store = BitPairReference::open(&base).unwrap();
        assert_eq!(store.unambiguous_code(0).unwrap(), 3);
        assert_eq!(store.unambiguous_code(2).unwrap(), 1);
        assert!(store.unambiguous_code(3).is_err());
    }
}
