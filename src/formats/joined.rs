//! Joined coordinate space of an on-disk index
//!
//! Positions are mapped through the fragment table of the primary
//! file. The joined text is the concatenation of all unambiguous runs,
//! which is exactly what the packed store holds, so symbols are read
//! from there instead of being restored from the BWT.

use crate::core::{
    BwtIndex, FragmentTable, IndexError, IndexMetadataProvider, IndexResult, JoinedCoordinate,
};
use crate::formats::bitpair::BitPairReference;
use crate::formats::ebwt::EbwtPrimary;

/// Joined-space view over a primary file and its packed store
///
/// The packed store (`.3.ebwt` + `.4.ebwt`) must be present: it is the
/// only source of joined symbols.
pub struct JoinedEbwt<'a> {
    fragments: FragmentTable,
    store: &'a BitPairReference,
}

impl<'a> JoinedEbwt<'a> {
    /// Combine the fragment table of `primary` with the bases of `store`
    ///
    /// Colorspace indexes are refused: their joined text holds colors,
    /// which only the BWT itself can give back.
    pub fn new(primary: &EbwtPrimary, store: &'a BitPairReference) -> IndexResult<Self> {
        if primary.is_colorspace() {
            return Err(IndexError::Unsupported(
                "joined traversal of a colorspace index needs the BWT text".to_string(),
            ));
        }
        let joined_len = primary.params().len as u64;
        if store.unambiguous_len() != joined_len {
            return Err(IndexError::Unsupported(format!(
                "joined text has {} positions but the packed store holds {} bases",
                joined_len,
                store.unambiguous_len()
            )));
        }
        Ok(Self {
            fragments: primary.fragment_table()?,
            store,
        })
    }
}

impl BwtIndex for JoinedEbwt<'_> {
    fn joined_len(&self) -> u64 {
        self.fragments.joined_len()
    }

    fn joined_to_text_off(&self, position: u64) -> IndexResult<JoinedCoordinate> {
        Ok(self.fragments.joined_to_text_off(position))
    }

    fn joined_symbol(&self, position: u64) -> IndexResult<u8> {
        self.store.unambiguous_code(position)
    }
}
