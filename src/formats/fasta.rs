//! FASTA output
//!
//! Writes `>name` header lines followed by the sequence, wrapped at a
//! fixed width or left on a single line.

use crate::core::LineWidth;
use std::io::{self, Write};

/// Streaming FASTA writer
pub struct FastaWriter<W: Write> {
    inner: W,
    line_width: LineWidth,
    records: usize,
}

impl<W: Write> FastaWriter<W> {
    pub fn new(inner: W, line_width: LineWidth) -> Self {
        Self {
            inner,
            line_width,
            records: 0,
        }
    }

    /// Write one record
    ///
    /// With wrapping, every sequence line holds exactly `width`
    /// symbols except a shorter final one. Without wrapping the whole
    /// sequence is one line. An empty sequence produces only the header.
    ///
    /// # Examples
    /// ```
    /// use ebwt_inspect::core::LineWidth;
    /// use ebwt_inspect::formats::FastaWriter;
    ///
    /// let mut writer = FastaWriter::new(Vec::new(), LineWidth::from_across(3).unwrap());
    /// writer.write_record("ref1", b"AACGT").unwrap();
    /// assert_eq!(writer.into_inner(), b">ref1\nAAC\nGT\n");
    /// ```
    pub fn write_record(&mut self, name: &str, seq: &[u8]) -> io::Result<()> {
        self.inner.write_all(b">")?;
        self.inner.write_all(name.as_bytes())?;
        self.inner.write_all(b"\n")?;

        match self.line_width.columns() {
            Some(width) => {
                for line in seq.chunks(width) {
                    self.inner.write_all(line)?;
                    self.inner.write_all(b"\n")?;
                }
            }
            None if !seq.is_empty() => {
                self.inner.write_all(seq)?;
                self.inner.write_all(b"\n")?;
            }
            None => {}
        }

        self.records += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.records
    }

    pub fn line_width(&self) -> LineWidth {
        self.line_width
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
