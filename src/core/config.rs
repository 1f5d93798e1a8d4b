//! Run configuration
//!
//! Everything that shapes a run is collected into one immutable
//! [`InspectConfig`] built from the command line and passed down
//! explicitly.

use crate::core::error::InspectError;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Default number of bases per FASTA line
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// Stretch size multiplier: each packed-store request covers this many lines
pub const LINES_PER_STRETCH: usize = 1000;

/// FASTA line wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineWidth {
    /// Break sequence lines every N symbols
    Wrapped(NonZeroUsize),
    /// Whole sequence on one line
    Unwrapped,
}

impl Default for LineWidth {
    fn default() -> Self {
        match NonZeroUsize::new(DEFAULT_LINE_WIDTH) {
            Some(width) => LineWidth::Wrapped(width),
            None => LineWidth::Unwrapped,
        }
    }
}

impl LineWidth {
    /// Interpret an `--across` value
    ///
    /// Positive values wrap; `0` and `-1` disable wrapping; anything
    /// lower is a usage error.
    ///
    /// # Examples
    /// ```
    /// use ebwt_inspect::core::LineWidth;
    ///
    /// assert_eq!(LineWidth::from_across(0).unwrap(), LineWidth::Unwrapped);
    /// assert_eq!(LineWidth::from_across(-1).unwrap(), LineWidth::Unwrapped);
    /// assert_eq!(LineWidth::from_across(60).unwrap().columns(), Some(60));
    /// assert!(LineWidth::from_across(-2).is_err());
    /// ```
    pub fn from_across(across: i64) -> Result<Self, InspectError> {
        if across < -1 {
            return Err(InspectError::Usage(
                "-a/--across arg must be at least 1".to_string(),
            ));
        }
        let width = match across {
            1.. => NonZeroUsize::new(usize::try_from(across).unwrap_or(usize::MAX)),
            _ => None,
        };
        Ok(width.map_or(LineWidth::Unwrapped, LineWidth::Wrapped))
    }

    /// Number of columns, if wrapping
    pub fn columns(&self) -> Option<usize> {
        match self {
            LineWidth::Wrapped(width) => Some(width.get()),
            LineWidth::Unwrapped => None,
        }
    }

    /// Maximum bases fetched per packed-store request
    ///
    /// Falls back to the default width when wrapping is disabled.
    /// Saturates for very wide lines.
    pub fn stretch_len(&self) -> usize {
        self.columns()
            .unwrap_or(DEFAULT_LINE_WIDTH)
            .saturating_mul(LINES_PER_STRETCH)
    }
}

/// How reference sequences are recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconstructionStrategy {
    /// Decode bases straight from the packed reference store
    #[default]
    PackedStore,
    /// Walk the joined coordinate space of the BWT index
    JoinedTraversal,
}

/// What a run prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectMode {
    /// FASTA records of every reference
    Sequences(ReconstructionStrategy),
    /// Reference names, one per line
    Names,
    /// Index parameters and per-reference lengths
    Summary,
}

impl Default for InspectMode {
    fn default() -> Self {
        InspectMode::Sequences(ReconstructionStrategy::default())
    }
}

impl InspectMode {
    /// Resolve the mode flags; names wins over summary, both win over sequences
    pub fn from_flags(names: bool, summary: bool, joined: bool) -> Self {
        if names {
            InspectMode::Names
        } else if summary {
            InspectMode::Summary
        } else if joined {
            InspectMode::Sequences(ReconstructionStrategy::JoinedTraversal)
        } else {
            InspectMode::Sequences(ReconstructionStrategy::PackedStore)
        }
    }
}

/// Immutable configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectConfig {
    /// Index base path (file names minus `.1.ebwt` etc.)
    pub index_base: PathBuf,
    pub mode: InspectMode,
    pub line_width: LineWidth,
    pub verbose: bool,
}

impl InspectConfig {
    /// Build a configuration, rejecting an empty index base
    pub fn new(
        index_base: impl Into<PathBuf>,
        mode: InspectMode,
        line_width: LineWidth,
        verbose: bool,
    ) -> Result<Self, InspectError> {
        let index_base = index_base.into();
        if index_base.as_os_str().is_empty() {
            return Err(InspectError::Usage("No index name given!".to_string()));
        }
        Ok(Self {
            index_base,
            mode,
            line_width,
            verbose,
        })
    }
}
