//! Output formats and index file adapters
//!
//! FASTA and listing writers, plus readers for the on-disk index file
//! family (`.1.ebwt` primary, `.3.ebwt`/`.4.ebwt` packed reference).

pub mod bitpair;
pub mod ebwt;
pub mod fasta;
pub mod joined;
pub mod listing;

pub use bitpair::{BitPairReference, RefRecord};
pub use ebwt::{read_flags, resolve_index_base, resolve_index_base_in, EbwtParams, EbwtPrimary};
pub use fasta::FastaWriter;
pub use joined::JoinedEbwt;
pub use listing::{write_names, write_summary};
