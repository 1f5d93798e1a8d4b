//! Name listing and index summary
//!
//! Plain text views of index metadata: one name per line, or a
//! tab-separated table of index parameters followed by one row per
//! reference.

use crate::core::{IndexMetadataProvider, Result};
use std::io::Write;

/// Print every reference name on its own line, in index order
pub fn write_names<M, W>(meta: &M, out: &mut W) -> Result<usize>
where
    M: IndexMetadataProvider + ?Sized,
    W: Write,
{
    let names = meta.reference_names();
    for name in names {
        writeln!(out, "{}", name)?;
    }
    Ok(names.len())
}

/// Print the index summary table
///
/// ```text
/// Flags           -flags
/// Reverse flags   -reverse flags
/// Colorspace      0|1
/// 2.0-compatible  0|1
/// SA-Sample       1 in 2^offRate
/// FTab-Chars      ftabChars
/// Sequence-1      name    length
/// ```
///
/// Colorspace lengths are reported one longer, as nucleotides.
pub fn write_summary<M, W>(meta: &M, out: &mut W) -> Result<()>
where
    M: IndexMetadataProvider + ?Sized,
    W: Write,
{
    let summary = meta.summary()?;
    let extra = u64::from(summary.colorspace);

    writeln!(out, "Flags\t{}", summary.flags.wrapping_neg())?;
    writeln!(out, "Reverse flags\t{}", summary.reverse_flags.wrapping_neg())?;
    writeln!(out, "Colorspace\t{}", u8::from(summary.colorspace))?;
    writeln!(out, "2.0-compatible\t{}", u8::from(summary.entire_reverse))?;
    writeln!(out, "SA-Sample\t1 in {}", summary.sa_sample())?;
    writeln!(out, "FTab-Chars\t{}", summary.ftab_chars)?;

    let lengths = meta.reference_lengths();
    for (i, name) in meta.reference_names().iter().enumerate() {
        let len = lengths.get(i).copied().unwrap_or(0) + extra;
        writeln!(out, "Sequence-{}\t{}\t{}", i + 1, name, len)?;
    }
    Ok(())
}
