//! Joined-space fragment table
//!
//! A BWT index stores its references as one joined text made of the
//! unambiguous runs ("fragments") of every reference, back to back.
//! Ambiguous stretches are not in the joined text at all. This table
//! records where each fragment starts in the joined space and where it
//! came from, and answers joined -> reference lookups with rust-lapper.

use crate::core::error::{IndexError, IndexResult};
use crate::core::index::JoinedCoordinate;
use rust_lapper::{Interval, Lapper};

/// One unambiguous run of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    /// First joined-space position of the run
    pub joined_start: u64,
    /// Reference the run belongs to
    pub reference: usize,
    /// Offset of the run's first base within the reference
    pub text_offset: u64,
    /// Number of bases
    pub len: u64,
}

/// Type alias for fragment intervals
pub type FragmentInterval = Interval<u64, Fragment>;

/// Fragment lookup over the joined coordinate space
pub struct FragmentTable {
    lapper: Lapper<u64, Fragment>,
    ref_lengths: Vec<u64>,
    joined_len: u64,
}

impl FragmentTable {
    /// Build a table from fragments and per-reference lengths
    ///
    /// Empty fragments are dropped. Every fragment must name a known
    /// reference.
    pub fn new(fragments: Vec<Fragment>, ref_lengths: Vec<u64>) -> IndexResult<Self> {
        let mut intervals = Vec::with_capacity(fragments.len());
        let mut joined_len = 0;

        for frag in fragments {
            if frag.reference >= ref_lengths.len() {
                return Err(IndexError::Unsupported(format!(
                    "fragment at joined offset {} names reference {} but only {} exist",
                    frag.joined_start,
                    frag.reference,
                    ref_lengths.len()
                )));
            }
            if frag.len == 0 {
                continue;
            }
            joined_len = joined_len.max(frag.joined_start + frag.len);
            intervals.push(Interval {
                start: frag.joined_start,
                stop: frag.joined_start + frag.len,
                val: frag,
            });
        }

        Ok(Self {
            lapper: Lapper::new(intervals),
            ref_lengths,
            joined_len,
        })
    }

    /// Build a table from flat `(joined offset, reference, text offset)` triples
    ///
    /// Each fragment runs up to the next triple's joined offset; the
    /// last one runs to `joined_len`.
    pub fn from_triples(
        triples: &[[u64; 3]],
        ref_lengths: Vec<u64>,
        joined_len: u64,
    ) -> IndexResult<Self> {
        let mut fragments = Vec::with_capacity(triples.len());

        for (i, triple) in triples.iter().enumerate() {
            let [joined_start, reference, text_offset] = *triple;
            let next = triples.get(i + 1).map_or(joined_len, |t| t[0]);
            if next < joined_start {
                return Err(IndexError::Unsupported(format!(
                    "fragment {} starts at joined offset {} after its successor at {}",
                    i, joined_start, next
                )));
            }
            fragments.push(Fragment {
                joined_start,
                reference: reference as usize,
                text_offset,
                len: next - joined_start,
            });
        }

        let mut table = Self::new(fragments, ref_lengths)?;
        table.joined_len = table.joined_len.max(joined_len);
        Ok(table)
    }

    /// Find the fragment containing a joined position
    pub fn locate(&self, position: u64) -> Option<&Fragment> {
        self.lapper
            .find(position, position + 1)
            .next()
            .map(|iv| &iv.val)
    }

    /// Map a joined position to reference coordinates
    pub fn joined_to_text_off(&self, position: u64) -> JoinedCoordinate {
        match self.locate(position) {
            Some(frag) => JoinedCoordinate::Mapped {
                reference: frag.reference,
                offset: frag.text_offset + (position - frag.joined_start),
                length: self.ref_lengths[frag.reference],
            },
            None => JoinedCoordinate::Unmapped,
        }
    }

    /// Size of the joined space
    pub fn joined_len(&self) -> u64 {
        self.joined_len
    }

    /// Per-reference lengths
    pub fn ref_lengths(&self) -> &[u64] {
        &self.ref_lengths
    }

    /// Number of non-empty fragments
    pub fn len(&self) -> usize {
        self.lapper.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.lapper.len() == 0
    }
}
