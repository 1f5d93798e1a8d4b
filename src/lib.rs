//! ebwt-inspect - reference reconstruction from BWT indexes
//!
//! Recovers the named nucleotide references an index was built from,
//! along with its names and build parameters.
//!
//! # Features
//!
//! - Fast path: decode references straight from the packed reference store
//! - Joined traversal: rebuild references position by position from the
//!   index's joined coordinate space, filling uncovered positions with `N`
//! - Streaming FASTA output, one finalized record in memory at a time
//! - Name listing and a tab-separated index summary
//!
//! # Example
//!
//! ```
//! use ebwt_inspect::core::{LineWidth, MemoryIndex, ReconstructionEngine};
//! use ebwt_inspect::formats::FastaWriter;
//!
//! let index = MemoryIndex::from_sequences([("ref1", "AACGT"), ("ref2", "GGC")]).unwrap();
//! let width = LineWidth::from_across(3).unwrap();
//! let engine = ReconstructionEngine::with_line_width(width);
//! let mut out = FastaWriter::new(Vec::new(), width);
//!
//! engine.reconstruct_joined(&index, &index, &mut out).unwrap();
//! assert_eq!(out.into_inner(), b">ref1\nAAC\nGT\n>ref2\nGGC\n");
//! ```

pub mod core;
pub mod formats;
mod inspect;

// Re-export commonly used types
pub use crate::core::{
    correct_leading_offset, BwtIndex, IndexError, IndexMetadataProvider, InspectConfig,
    InspectError, InspectMode, IntegrityError, JoinedCoordinate, LineWidth, MemoryIndex,
    PackedReferenceStore, ReconstructionEngine, ReconstructionStrategy, ReferenceRecord, Result,
};
pub use formats::FastaWriter;
pub use inspect::inspect;
