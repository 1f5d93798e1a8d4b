//! Index capabilities consumed by the reconstruction engine
//!
//! The engine never touches index bytes directly. It talks to three
//! narrow traits: metadata (names, lengths, flags), a packed reference
//! store that hands out raw base codes, and a BWT index that maps
//! joined-space positions back to reference coordinates.

use crate::core::error::IndexResult;

/// Result of mapping one joined-space position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinedCoordinate {
    /// Position falls in padding or outside every reference
    Unmapped,
    /// Position lies inside a reference
    Mapped {
        /// Reference index (into the name list)
        reference: usize,
        /// 0-based offset within the reference
        offset: u64,
        /// Declared length of the reference
        length: u64,
    },
}

impl JoinedCoordinate {
    /// The mapping, if it contributes a base
    ///
    /// A `Mapped` value whose offset is not below the reference length
    /// is a seam artifact and contributes nothing, like `Unmapped`.
    ///
    /// # Examples
    /// ```
    /// use ebwt_inspect::core::JoinedCoordinate;
    ///
    /// let inside = JoinedCoordinate::Mapped { reference: 0, offset: 2, length: 5 };
    /// let seam = JoinedCoordinate::Mapped { reference: 0, offset: 5, length: 5 };
    /// assert_eq!(inside.contributing(), Some((0, 2, 5)));
    /// assert_eq!(seam.contributing(), None);
    /// assert_eq!(JoinedCoordinate::Unmapped.contributing(), None);
    /// ```
    #[inline]
    pub fn contributing(&self) -> Option<(usize, u64, u64)> {
        match *self {
            JoinedCoordinate::Mapped {
                reference,
                offset,
                length,
            } if offset < length => Some((reference, offset, length)),
            _ => None,
        }
    }
}

/// Index-wide parameters shown by summary mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexSummary {
    /// Raw flags word of the forward index (stored negated)
    pub flags: i32,
    /// Raw flags word of the reverse index
    pub reverse_flags: i32,
    /// Index holds colors instead of nucleotides
    pub colorspace: bool,
    /// Reverse index is the reverse of the entire joined text
    pub entire_reverse: bool,
    /// log2 of the suffix-array sampling rate
    pub off_rate: u32,
    /// Characters covered by the lookup table
    pub ftab_chars: u32,
}

/// Flags bit: index holds colors
pub const FLAG_COLOR: i32 = 2;

/// Flags bit: reverse index covers the entire joined text
pub const FLAG_ENTIRE_REV: i32 = 4;

/// Flags word written by the index builder (always negated on disk)
pub fn encode_flags(colorspace: bool, entire_reverse: bool) -> i32 {
    let mut flags = 1;
    if colorspace {
        flags |= FLAG_COLOR;
    }
    if entire_reverse {
        flags |= FLAG_ENTIRE_REV;
    }
    -flags
}

/// Test a bit of a stored flags word; only negative words carry flags
#[inline]
pub fn flag_set(flags: i32, bit: i32) -> bool {
    flags < 0 && (flags.wrapping_neg() & bit) != 0
}

impl IndexSummary {
    /// Assemble a summary from the raw flags words of both indexes
    pub fn from_flags(flags: i32, reverse_flags: i32, off_rate: u32, ftab_chars: u32) -> Self {
        Self {
            flags,
            reverse_flags,
            colorspace: flag_set(flags, FLAG_COLOR),
            entire_reverse: flag_set(reverse_flags, FLAG_ENTIRE_REV),
            off_rate,
            ftab_chars,
        }
    }

    /// One suffix-array entry is kept per this many rows
    pub fn sa_sample(&self) -> u64 {
        1u64 << self.off_rate
    }
}

/// Names, lengths and flags of an index
pub trait IndexMetadataProvider {
    /// Reference names in index order
    fn reference_names(&self) -> &[String];

    /// Length of every reference as recorded in the index
    fn reference_lengths(&self) -> &[u64];

    /// Whether the index stores colors (alternate alphabet)
    fn is_colorspace(&self) -> bool;

    /// Parameters for summary mode
    fn summary(&self) -> IndexResult<IndexSummary>;
}

/// Direct access to the unencoded reference bases
pub trait PackedReferenceStore {
    /// Number of references held by the store
    fn num_references(&self) -> usize;

    /// Fetch `len` base codes of `reference` starting at `start`
    ///
    /// The codes are written into `buf` (resized as needed) and the
    /// return value is the offset in `buf` at which they begin; bytes
    /// before it are alignment padding and must be skipped.
    fn get_stretch(
        &self,
        buf: &mut Vec<u8>,
        reference: usize,
        start: u64,
        len: usize,
    ) -> IndexResult<usize>;
}

/// The joined coordinate space of a BWT index
pub trait BwtIndex {
    /// Number of positions in the joined space
    fn joined_len(&self) -> u64;

    /// Map a joined position to reference coordinates
    fn joined_to_text_off(&self, position: u64) -> IndexResult<JoinedCoordinate>;

    /// Symbol code stored at a joined position
    fn joined_symbol(&self, position: u64) -> IndexResult<u8>;
}
