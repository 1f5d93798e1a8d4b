//! Nucleotide symbol codes
//!
//! Index components exchange bases as small integer codes 0-4 which
//! index into the fixed table `ACGTN`. Code 4 doubles as the
//! placeholder for positions the index does not cover.

use crate::core::error::IntegrityError;

/// Decoding table for symbol codes
pub const ALPHABET: &[u8; 5] = b"ACGTN";

/// Code of the ambiguous/placeholder symbol
pub const N_CODE: u8 = 4;

/// Placeholder symbol inserted for uncovered positions
pub const PLACEHOLDER: u8 = b'N';

/// Decode a single symbol code
///
/// # Examples
/// ```
/// use ebwt_inspect::core::alphabet::decode_code;
///
/// assert_eq!(decode_code(0).unwrap(), b'A');
/// assert_eq!(decode_code(4).unwrap(), b'N');
/// assert!(decode_code(5).is_err());
/// ```
#[inline]
pub fn decode_code(code: u8) -> Result<u8, IntegrityError> {
    ALPHABET
        .get(code as usize)
        .copied()
        .ok_or(IntegrityError::InvalidSymbolCode { code })
}

/// Decode a run of symbol codes, appending the bases to `out`
///
/// Stops at the first out-of-range code; `out` keeps whatever was
/// decoded before it.
pub fn decode_into(codes: &[u8], out: &mut Vec<u8>) -> Result<(), IntegrityError> {
    out.reserve(codes.len());
    for &code in codes {
        out.push(decode_code(code)?);
    }
    Ok(())
}

/// Encode a base as a symbol code
///
/// Only unambiguous bases (either case) have a code below 4; every
/// other byte encodes as [`N_CODE`].
#[inline]
pub fn encode_base(base: u8) -> u8 {
    match base {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' => 3,
        _ => N_CODE,
    }
}

/// Check whether a base is one of A, C, G, T (either case)
#[inline]
pub fn is_unambiguous(base: u8) -> bool {
    encode_base(base) < N_CODE
}
