//! Reference reconstruction
//!
//! Recovers every reference sequence of an index and streams it to a
//! [`FastaWriter`], one finalized record at a time. Two strategies:
//!
//! 1. Packed store: read each reference front to back in fixed-size
//!    stretches and decode the codes.
//! 2. Joined traversal: visit every joined-space position in order,
//!    map it back to (reference, offset) and rebuild the references
//!    from the hits, filling uncovered positions with `N`.
//!
//! Joined traversal costs one lookup per joined position no matter how
//! sparse the coverage is.

use crate::core::alphabet::{decode_code, decode_into, PLACEHOLDER};
use crate::core::config::{InspectConfig, LineWidth};
use crate::core::error::{IndexError, IntegrityError, Result};
use crate::core::index::{BwtIndex, IndexMetadataProvider, PackedReferenceStore};
use crate::formats::fasta::FastaWriter;
use log::{debug, info};
use std::io::Write;

/// Extra scratch capacity beyond one stretch, for alignment padding
const STRETCH_SLACK: usize = 128;

/// A reconstructed reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    pub name: String,
    pub declared_length: u64,
    /// Bases from `ACGTN`
    pub sequence: Vec<u8>,
}

impl ReferenceRecord {
    pub fn new(name: impl Into<String>, declared_length: u64) -> Self {
        Self {
            name: name.into(),
            declared_length,
            sequence: Vec::new(),
        }
    }

    /// Right-pad with `N` up to the declared length
    ///
    /// Returns the number of placeholders added. A sequence already
    /// longer than declared is an integrity error.
    pub fn finalize(&mut self) -> std::result::Result<u64, IntegrityError> {
        let actual = self.sequence.len() as u64;
        if actual > self.declared_length {
            return Err(IntegrityError::RecordOverflow {
                name: self.name.clone(),
                declared: self.declared_length,
                actual,
            });
        }
        let missing = self.declared_length - actual;
        self.sequence.resize(self.declared_length as usize, PLACEHOLDER);
        Ok(missing)
    }
}

/// Offset used for gap computation of a record's first base
///
/// The first contributing base of a record reports its offset one
/// short whenever it is not at the very start of the reference; every
/// later base is taken as reported.
///
/// # Examples
/// ```
/// use ebwt_inspect::core::correct_leading_offset;
///
/// assert_eq!(correct_leading_offset(0, true), 0);
/// assert_eq!(correct_leading_offset(4, true), 5);
/// assert_eq!(correct_leading_offset(4, false), 4);
/// ```
#[inline]
pub fn correct_leading_offset(offset: u64, is_first_in_record: bool) -> u64 {
    if is_first_in_record && offset > 0 {
        offset + 1
    } else {
        offset
    }
}

/// A record being assembled from joined-space hits
#[derive(Debug)]
pub struct RecordBuilder {
    reference: usize,
    record: ReferenceRecord,
    /// Reported offset of the last appended base
    last_offset: u64,
    first: bool,
    placeholders: u64,
}

impl RecordBuilder {
    /// Open an empty record for a reference
    pub fn open(reference: usize, name: impl Into<String>, declared_length: u64) -> Self {
        Self {
            reference,
            record: ReferenceRecord::new(name, declared_length),
            last_offset: 0,
            first: true,
            placeholders: 0,
        }
    }

    pub fn reference(&self) -> usize {
        self.reference
    }

    /// Current sequence (not yet padded)
    pub fn sequence(&self) -> &[u8] {
        &self.record.sequence
    }

    /// Append a base found at `offset`, filling any gap before it with `N`
    pub fn push_base(&mut self, offset: u64, base: u8) -> std::result::Result<(), IntegrityError> {
        let adjusted = correct_leading_offset(offset, self.first);
        let gap = adjusted.saturating_sub(self.last_offset).saturating_sub(1);

        let needed = self.record.sequence.len() as u64 + gap + 1;
        if needed > self.record.declared_length {
            return Err(IntegrityError::RecordOverflow {
                name: self.record.name.clone(),
                declared: self.record.declared_length,
                actual: needed,
            });
        }

        if gap > 0 {
            let len = self.record.sequence.len() + gap as usize;
            self.record.sequence.resize(len, PLACEHOLDER);
            self.placeholders += gap;
        }
        self.record.sequence.push(base);
        self.last_offset = offset;
        self.first = false;
        Ok(())
    }

    /// Pad to the declared length and hand out the record
    pub fn finish(mut self) -> std::result::Result<(ReferenceRecord, u64), IntegrityError> {
        let padded = self.record.finalize()?;
        Ok((self.record, self.placeholders + padded))
    }
}

/// Counters for one reconstruction pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructionStats {
    /// Records emitted
    pub records: usize,
    /// Bases emitted, placeholders included
    pub bases: u64,
    /// `N`s inserted for uncovered positions
    pub placeholders: u64,
    /// Joined positions visited (joined traversal only)
    pub positions: u64,
    /// Joined positions that contributed nothing
    pub skipped: u64,
}

/// Drives either reconstruction strategy
#[derive(Debug, Clone, Copy)]
pub struct ReconstructionEngine {
    line_width: LineWidth,
}

impl ReconstructionEngine {
    pub fn new(config: &InspectConfig) -> Self {
        Self::with_line_width(config.line_width)
    }

    pub fn with_line_width(line_width: LineWidth) -> Self {
        Self { line_width }
    }

    /// Bases requested per packed-store call
    pub fn stretch_len(&self) -> usize {
        self.line_width.stretch_len()
    }

    /// Reconstruct every reference from the packed store
    ///
    /// Colorspace indexes record color lengths; their packed store holds
    /// the nucleotide decoding, which is one base longer.
    pub fn reconstruct_packed<M, S, W>(
        &self,
        meta: &M,
        store: &S,
        out: &mut FastaWriter<W>,
    ) -> Result<ReconstructionStats>
    where
        M: IndexMetadataProvider + ?Sized,
        S: PackedReferenceStore + ?Sized,
        W: Write,
    {
        let names = meta.reference_names();
        let lengths = meta.reference_lengths();
        if store.num_references() != names.len() {
            return Err(IntegrityError::ReferenceCountMismatch {
                store: store.num_references(),
                names: names.len(),
            }
            .into());
        }

        let extra = u64::from(meta.is_colorspace());
        let incr = self.stretch_len();
        // No request is longer than the longest reference
        let longest = lengths.iter().max().map_or(0, |&len| len + extra);
        let capacity = usize::try_from(longest).map_or(incr, |len| len.min(incr));
        let mut scratch = Vec::with_capacity(capacity.saturating_add(STRETCH_SLACK));
        let mut stats = ReconstructionStats::default();

        for (i, name) in names.iter().enumerate() {
            let declared = lengths
                .get(i)
                .copied()
                .ok_or(IntegrityError::ReferenceOutOfRange {
                    index: i,
                    count: lengths.len(),
                })?
                + extra;

            let mut record = ReferenceRecord::new(name.as_str(), declared);
            record.sequence.reserve(declared as usize);

            let mut start = 0u64;
            while start < declared {
                let amt = (declared - start).min(incr as u64) as usize;
                let off = store.get_stretch(&mut scratch, i, start, amt)?;
                let codes = scratch.get(off..off + amt).ok_or(IndexError::ShortStretch {
                    reference: i,
                    expected: amt,
                    actual: scratch.len().saturating_sub(off),
                })?;
                decode_into(codes, &mut record.sequence)?;
                start += amt as u64;
            }

            let padded = record.finalize()?;
            emit(&record, padded, out, &mut stats)?;
        }

        info!(
            "Packed store: {} records, {} bases",
            stats.records, stats.bases
        );
        Ok(stats)
    }

    /// Reconstruct every covered reference by walking the joined space
    ///
    /// References without a single joined position never open a record
    /// and are not emitted.
    pub fn reconstruct_joined<M, B, W>(
        &self,
        meta: &M,
        bwt: &B,
        out: &mut FastaWriter<W>,
    ) -> Result<ReconstructionStats>
    where
        M: IndexMetadataProvider + ?Sized,
        B: BwtIndex + ?Sized,
        W: Write,
    {
        let names = meta.reference_names();
        let mut stats = ReconstructionStats::default();
        let mut open: Option<RecordBuilder> = None;

        for position in 0..bwt.joined_len() {
            stats.positions += 1;
            let Some((reference, offset, length)) =
                bwt.joined_to_text_off(position)?.contributing()
            else {
                stats.skipped += 1;
                continue;
            };

            let builder = match open.take() {
                Some(builder) if builder.reference() == reference => open.insert(builder),
                previous => {
                    if let Some(previous) = previous {
                        let (record, placeholders) = previous.finish()?;
                        emit(&record, placeholders, out, &mut stats)?;
                    }
                    let name = names.get(reference).ok_or(IntegrityError::ReferenceOutOfRange {
                        index: reference,
                        count: names.len(),
                    })?;
                    open.insert(RecordBuilder::open(reference, name.as_str(), length))
                }
            };

            let base = decode_code(bwt.joined_symbol(position)?)?;
            builder.push_base(offset, base)?;
        }

        if let Some(last) = open.take() {
            let (record, placeholders) = last.finish()?;
            emit(&record, placeholders, out, &mut stats)?;
        }

        info!(
            "Joined traversal: {} positions ({} skipped), {} records, {} bases",
            stats.positions, stats.skipped, stats.records, stats.bases
        );
        Ok(stats)
    }
}

/// Hand a finalized record to the writer and count it
fn emit<W: Write>(
    record: &ReferenceRecord,
    placeholders: u64,
    out: &mut FastaWriter<W>,
    stats: &mut ReconstructionStats,
) -> Result<()> {
    out.write_record(&record.name, &record.sequence)?;
    debug!(
        "Wrote {} ({} bases, {} placeholders)",
        record.name,
        record.sequence.len(),
        placeholders
    );
    stats.records += 1;
    stats.bases += record.sequence.len() as u64;
    stats.placeholders += placeholders;
    Ok(())
}
