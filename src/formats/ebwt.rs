//! Primary index file (`<base>.1.ebwt`)
//!
//! # Layout
//!
//! All words are 32-bit, in the byte order of the writing machine.
//!
//! ```text
//! one len lineRate linesPerSide offRate ftabChars flags
//! nPat plen[nPat]
//! nFrag rstarts[3 * nFrag]          (joined offset, reference, text offset)
//! ebwt[ebwtTotLen]                  (bytes, size derived from the header)
//! zOff fchr[5] ftab[4^ftabChars + 1] eftab[2 * ftabChars]
//! name\nname\n...\0                 (reference names)
//! ```
//!
//! Only the header, the length and fragment tables and the names are
//! decoded; the BWT body and lookup tables are skipped.

use crate::core::{
    flag_set, FragmentTable, IndexError, IndexMetadataProvider, IndexResult, IndexSummary,
    FLAG_COLOR,
};
use crate::core::io::{with_suffix, MappedFile, WordCursor};
use log::{debug, warn};
use memchr::memchr;
use std::path::{Path, PathBuf};

/// Suffix of the forward primary index file
pub const PRIMARY_SUFFIX: &str = ".1.ebwt";

/// Suffix of the reverse primary index file
pub const REVERSE_PRIMARY_SUFFIX: &str = ".rev.1.ebwt";

/// Environment variable listing extra index directories
pub const INDEX_PATH_ENV: &str = "BOWTIE_INDEXES";

/// Header parameters of a primary index file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EbwtParams {
    /// Length of the joined text
    pub len: u32,
    pub line_rate: i32,
    pub lines_per_side: i32,
    pub off_rate: i32,
    pub ftab_chars: i32,
    /// Stored flags word (negated bit set)
    pub flags: i32,
}

impl EbwtParams {
    fn read(cursor: &mut WordCursor<'_>, path: &Path) -> IndexResult<Self> {
        let params = Self {
            len: cursor.read_u32()?,
            line_rate: cursor.read_i32()?,
            lines_per_side: cursor.read_i32()?,
            off_rate: cursor.read_i32()?,
            ftab_chars: cursor.read_i32()?,
            flags: cursor.read_i32()?,
        };
        params.validate(path)?;
        Ok(params)
    }

    fn validate(&self, path: &Path) -> IndexResult<()> {
        let invalid = |message: String| IndexError::InvalidHeader {
            path: path.to_path_buf(),
            message,
        };
        if !(0..32).contains(&self.line_rate) {
            return Err(invalid(format!("line rate {} out of range", self.line_rate)));
        }
        if self.lines_per_side < 1 {
            return Err(invalid(format!("lines per side {} must be positive", self.lines_per_side)));
        }
        if self.side_size() <= 8 {
            return Err(invalid(format!("side size {} leaves no room for BWT bytes", self.side_size())));
        }
        if !(0..32).contains(&self.off_rate) {
            return Err(invalid(format!("offset rate {} out of range", self.off_rate)));
        }
        if !(1..=16).contains(&self.ftab_chars) {
            return Err(invalid(format!("ftab chars {} out of range", self.ftab_chars)));
        }
        Ok(())
    }

    /// Bytes per BWT side
    pub fn side_size(&self) -> u64 {
        (1u64 << self.line_rate) * self.lines_per_side as u64
    }

    /// Size in bytes of the BWT body
    pub fn ebwt_tot_len(&self) -> u64 {
        let bwt_sz = self.len as u64 / 4 + 1;
        let side_sz = self.side_size();
        let side_bwt_sz = side_sz - 8;
        let num_side_pairs = (bwt_sz + 2 * side_bwt_sz - 1) / (2 * side_bwt_sz);
        num_side_pairs * 2 * side_sz
    }

    /// Entries in the lookup table
    pub fn ftab_len(&self) -> u64 {
        (1u64 << (self.ftab_chars as u64 * 2)) + 1
    }

    /// Entries in the extended lookup table
    pub fn eftab_len(&self) -> u64 {
        self.ftab_chars as u64 * 2
    }

    pub fn is_colorspace(&self) -> bool {
        flag_set(self.flags, FLAG_COLOR)
    }
}

/// Decoded primary index file
#[derive(Debug, Clone)]
pub struct EbwtPrimary {
    base: PathBuf,
    params: EbwtParams,
    plen: Vec<u64>,
    rstarts: Vec<[u64; 3]>,
    names: Vec<String>,
}

impl EbwtPrimary {
    /// Read `<base>.1.ebwt`
    pub fn open<P: AsRef<Path>>(base: P) -> IndexResult<Self> {
        let base = base.as_ref().to_path_buf();
        let path = with_suffix(&base, PRIMARY_SUFFIX);
        let file = MappedFile::open(&path)?;
        let mut cursor = file.cursor();

        cursor.read_endianness()?;
        let params = EbwtParams::read(&mut cursor, &path)?;
        debug!("{}: {:?} (byte-swapped: {})", path.display(), params, cursor.is_swapped());

        let n_pat = cursor.read_u32()? as usize;
        let plen: Vec<u64> = cursor.read_u32_vec(n_pat)?.into_iter().map(u64::from).collect();

        let n_frag = cursor.read_u32()? as usize;
        let rstarts: Vec<[u64; 3]> = cursor
            .read_u32_vec(n_frag * 3)?
            .chunks_exact(3)
            .map(|t| [t[0] as u64, t[1] as u64, t[2] as u64])
            .collect();

        cursor.skip(params.ebwt_tot_len())?;
        cursor.skip(4)?; // zOff
        cursor.skip(5 * 4)?; // fchr
        cursor.skip(params.ftab_len() * 4)?;
        cursor.skip(params.eftab_len() * 4)?;

        let names = parse_names(cursor.remaining());
        if names.len() != plen.len() {
            return Err(IndexError::InvalidHeader {
                path,
                message: format!(
                    "{} reference names for {} reference lengths",
                    names.len(),
                    plen.len()
                ),
            });
        }

        Ok(Self {
            base,
            params,
            plen,
            rstarts,
            names,
        })
    }

    /// Index base this file was read from
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn params(&self) -> &EbwtParams {
        &self.params
    }

    /// Fragment triples in joined order
    pub fn rstarts(&self) -> &[[u64; 3]] {
        &self.rstarts
    }

    /// Joined-space fragment table of this index
    pub fn fragment_table(&self) -> IndexResult<FragmentTable> {
        FragmentTable::from_triples(&self.rstarts, self.plen.clone(), self.params.len as u64)
    }
}

impl IndexMetadataProvider for EbwtPrimary {
    fn reference_names(&self) -> &[String] {
        &self.names
    }

    fn reference_lengths(&self) -> &[u64] {
        &self.plen
    }

    fn is_colorspace(&self) -> bool {
        self.params.is_colorspace()
    }

    /// Also reads the flags word of `<base>.rev.1.ebwt`
    fn summary(&self) -> IndexResult<IndexSummary> {
        let reverse_flags = read_flags(with_suffix(&self.base, REVERSE_PRIMARY_SUFFIX))?;
        Ok(IndexSummary::from_flags(
            self.params.flags,
            reverse_flags,
            self.params.off_rate as u32,
            self.params.ftab_chars as u32,
        ))
    }
}

/// Read only the flags word of a primary index file
pub fn read_flags<P: AsRef<Path>>(path: P) -> IndexResult<i32> {
    let path = path.as_ref();
    let file = MappedFile::open(path)?;
    let mut cursor = file.cursor();
    cursor.read_endianness()?;
    // len, lineRate, linesPerSide, offRate, ftabChars
    cursor.skip(5 * 4)?;
    cursor.read_i32()
}

/// Split the trailing name block
///
/// Names are newline-terminated; a NUL byte ends the block early.
fn parse_names(block: &[u8]) -> Vec<String> {
    let block = &block[..memchr(0, block).unwrap_or(block.len())];
    let mut names: Vec<String> = block
        .split(|&b| b == b'\n')
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();
    if names.last().is_some_and(|n| n.is_empty()) {
        names.pop();
    }
    names
}

/// Locate an index given its base name
///
/// The base is used as given when `<base>.1.ebwt` exists. Otherwise a
/// relative base is looked up in each directory of `search_dirs`, in
/// order.
pub fn resolve_index_base_in(base: &Path, search_dirs: &[PathBuf]) -> IndexResult<PathBuf> {
    if with_suffix(base, PRIMARY_SUFFIX).is_file() {
        return Ok(base.to_path_buf());
    }
    if base.is_relative() {
        for dir in search_dirs {
            let candidate = dir.join(base);
            if with_suffix(&candidate, PRIMARY_SUFFIX).is_file() {
                debug!("Resolved index {} to {}", base.display(), candidate.display());
                return Ok(candidate);
            }
        }
    }
    Err(IndexError::FileNotFound(with_suffix(base, PRIMARY_SUFFIX)))
}

/// Locate an index in the working directory, `$BOWTIE_INDEXES`, or
/// an `indexes/` directory next to the executable
pub fn resolve_index_base(base: &Path) -> IndexResult<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(paths) = std::env::var_os(INDEX_PATH_ENV) {
        dirs.extend(std::env::split_paths(&paths));
    }
    match std::env::current_exe() {
        Ok(exe) => {
            if let Some(dir) = exe.parent() {
                dirs.push(dir.join("indexes"));
            }
        }
        Err(e) => warn!("Cannot locate executable for index search: {}", e),
    }
    resolve_index_base_in(base, &dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn params(len: u32) -> EbwtParams {
        EbwtParams {
            len,
            line_rate: 6,
            lines_per_side: 2,
            off_rate: 5,
            ftab_chars: 10,
            flags: -1,
        }
    }

    #[test]
    fn test_ebwt_tot_len() {
        // side = 128 bytes, 120 BWT bytes per side, 240 per side pair
        assert_eq!(params(0).ebwt_tot_len(), 256);
        assert_eq!(params(955).ebwt_tot_len(), 256);
        assert_eq!(params(960).ebwt_tot_len(), 512);
    }

    #[test]
    fn test_table_sizes() {
        let p = params(100);
        assert_eq!(p.ftab_len(), (1 << 20) + 1);
        assert_eq!(p.eftab_len(), 20);
    }

    #[test]
    fn test_validate() {
        let path = Path::new("x.1.ebwt");
        assert!(params(10).validate(path).is_ok());

        let mut bad = params(10);
        bad.lines_per_side = 0;
        assert!(bad.validate(path).is_err());

        let mut bad = params(10);
        bad.line_rate = 3;
        bad.lines_per_side = 1;
        assert!(bad.validate(path).is_err());

        let mut bad = params(10);
        bad.ftab_chars = 0;
        assert!(bad.validate(path).is_err());
    }

    #[test]
    fn test_colorspace_flag() {
        let mut p = params(1);
        assert!(!p.is_colorspace());
        p.flags = -3;
        assert!(p.is_colorspace());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(parse_names(b"chr1\nchr2 extra\n"), vec!["chr1", "chr2 extra"]);
        assert_eq!(parse_names(b"a\nb\n\0trailing junk"), vec!["a", "b"]);
        assert_eq!(parse_names(b"a\nb"), vec!["a", "b"]);
        assert!(parse_names(b"").is_empty());
        assert!(parse_names(b"\0").is_empty());
    }

    #[test]
    fn test_resolve_index_base() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lambda.1.ebwt"), b"").unwrap();

        let direct = dir.path().join("lambda");
        assert_eq!(resolve_index_base_in(&direct, &[]).unwrap(), direct);

        let found = resolve_index_base_in(Path::new("lambda"), &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found, dir.path().join("lambda"));

        assert!(matches!(
            resolve_index_base_in(Path::new("missing"), &[dir.path().to_path_buf()]),
            Err(IndexError::FileNotFound(_))
        ));
    }
}
