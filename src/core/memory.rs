//! In-memory index
//!
//! [`MemoryIndex`] builds all three index capabilities from plain
//! `(name, sequence)` pairs. Sequences are split the same way the
//! on-disk index splits them: runs of A/C/G/T become fragments of the
//! joined text, everything else becomes a gap that only the packed
//! store remembers (as `N`).

use crate::core::alphabet::{encode_base, N_CODE};
use crate::core::error::{IndexError, IndexResult};
use crate::core::fragments::{Fragment, FragmentTable};
use crate::core::index::{
    encode_flags, BwtIndex, IndexMetadataProvider, IndexSummary, JoinedCoordinate,
    PackedReferenceStore,
};

/// Filler written before stretch codes when alignment is enabled
pub const ALIGNMENT_FILL: u8 = 0xFF;

/// Index held entirely in memory
pub struct MemoryIndex {
    names: Vec<String>,
    lengths: Vec<u64>,
    /// Per-reference symbol codes, gaps included
    codes: Vec<Vec<u8>>,
    /// Joined text: unambiguous codes only
    joined: Vec<u8>,
    fragments: FragmentTable,
    summary: IndexSummary,
    stretch_alignment: usize,
}

impl MemoryIndex {
    /// Build an index from named sequences
    ///
    /// # Example
    /// ```
    /// use ebwt_inspect::core::{BwtIndex, MemoryIndex};
    ///
    /// let index = MemoryIndex::from_sequences([("chr1", "ACNNGT"), ("chr2", "TT")]).unwrap();
    /// // Ambiguous bases are not part of the joined text
    /// assert_eq!(index.joined_len(), 6);
    /// ```
    pub fn from_sequences<I, N, S>(references: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<[u8]>,
    {
        let mut names = Vec::new();
        let mut lengths = Vec::new();
        let mut codes = Vec::new();
        let mut joined = Vec::new();
        let mut fragments = Vec::new();

        for (reference, (name, seq)) in references.into_iter().enumerate() {
            let ref_codes: Vec<u8> = seq.as_ref().iter().map(|&b| encode_base(b)).collect();

            let mut run_start: Option<usize> = None;
            for (i, &code) in ref_codes.iter().chain(std::iter::once(&N_CODE)).enumerate() {
                match (code < N_CODE, run_start) {
                    (true, None) => run_start = Some(i),
                    (false, Some(start)) => {
                        fragments.push(Fragment {
                            joined_start: joined.len() as u64,
                            reference,
                            text_offset: start as u64,
                            len: (i - start) as u64,
                        });
                        joined.extend_from_slice(&ref_codes[start..i]);
                        run_start = None;
                    }
                    _ => {}
                }
            }

            names.push(name.into());
            lengths.push(ref_codes.len() as u64);
            codes.push(ref_codes);
        }

        let fragments = FragmentTable::new(fragments, lengths.clone())?;

        Ok(Self {
            names,
            lengths,
            codes,
            joined,
            fragments,
            summary: IndexSummary::from_flags(encode_flags(false, false), encode_flags(false, true), 5, 10),
            stretch_alignment: 1,
        })
    }

    /// Pad every stretch so its codes start at `start % alignment`
    ///
    /// Mirrors stores that hand out word-aligned buffers. The padding
    /// bytes are [`ALIGNMENT_FILL`], which is not a valid code.
    pub fn with_stretch_alignment(mut self, alignment: usize) -> Self {
        self.stretch_alignment = alignment.max(1);
        self
    }

    /// Replace the summary parameters
    pub fn with_summary(mut self, summary: IndexSummary) -> Self {
        self.summary = summary;
        self
    }

    /// Fragment table of the joined space
    pub fn fragments(&self) -> &FragmentTable {
        &self.fragments
    }
}

impl IndexMetadataProvider for MemoryIndex {
    fn reference_names(&self) -> &[String] {
        &self.names
    }

    fn reference_lengths(&self) -> &[u64] {
        &self.lengths
    }

    fn is_colorspace(&self) -> bool {
        self.summary.colorspace
    }

    fn summary(&self) -> IndexResult<IndexSummary> {
        Ok(self.summary)
    }
}

impl PackedReferenceStore for MemoryIndex {
    fn num_references(&self) -> usize {
        self.codes.len()
    }

    fn get_stretch(
        &self,
        buf: &mut Vec<u8>,
        reference: usize,
        start: u64,
        len: usize,
    ) -> IndexResult<usize> {
        let ref_codes = self.codes.get(reference).ok_or_else(|| {
            IndexError::Unsupported(format!("no reference with index {}", reference))
        })?;
        let end = start + len as u64;
        if end > ref_codes.len() as u64 {
            return Err(IndexError::StretchOutOfRange {
                reference,
                start,
                end,
                length: ref_codes.len() as u64,
            });
        }

        let pad = (start % self.stretch_alignment as u64) as usize;
        buf.clear();
        buf.resize(pad, ALIGNMENT_FILL);
        buf.extend_from_slice(&ref_codes[start as usize..end as usize]);
        Ok(pad)
    }
}

impl BwtIndex for MemoryIndex {
    fn joined_len(&self) -> u64 {
        self.joined.len() as u64
    }

    fn joined_to_text_off(&self, position: u64) -> IndexResult<JoinedCoordinate> {
        Ok(self.fragments.joined_to_text_off(position))
    }

    fn joined_symbol(&self, position: u64) -> IndexResult<u8> {
        self.joined.get(position as usize).copied().ok_or_else(|| {
            IndexError::Unsupported(format!(
                "joined position {} beyond joined length {}",
                position,
                self.joined.len()
            ))
        })
    }
}
