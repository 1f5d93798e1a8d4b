//! Reconstruction core
//!
//! Index capability traits, the joined-space fragment table, and the
//! engine that turns either capability back into reference sequences.

pub mod alphabet;
mod config;
mod error;
mod fragments;
mod index;
pub mod io;
mod memory;
mod reconstruct;

pub use config::{
    InspectConfig, InspectMode, LineWidth, ReconstructionStrategy, DEFAULT_LINE_WIDTH,
    LINES_PER_STRETCH,
};
pub use error::{
    IndexError, IndexResult, InspectError, IntegrityError, Result,
};
pub use fragments::{Fragment, FragmentInterval, FragmentTable};
pub use index::{
    encode_flags, flag_set, BwtIndex, IndexMetadataProvider, IndexSummary, JoinedCoordinate,
    PackedReferenceStore, FLAG_COLOR, FLAG_ENTIRE_REV,
};
pub use io::{MappedFile, WordCursor, DEFAULT_BUFFER_SIZE};
pub use memory::{MemoryIndex, ALIGNMENT_FILL};
pub use reconstruct::{
    correct_leading_offset, ReconstructionEngine, ReconstructionStats, RecordBuilder,
    ReferenceRecord,
};
