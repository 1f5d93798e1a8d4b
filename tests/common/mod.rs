//! Synthetic on-disk index writer shared by the integration tests
//!
//! Produces `.1.ebwt`, `.rev.1.ebwt`, `.3.ebwt` and `.4.ebwt` files
//! for a set of named sequences. The BWT body and lookup tables are
//! zero-filled; only their sizes matter to the reader.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ebwt_inspect::core::encode_flags;
use ebwt_inspect::core::io::with_suffix;

pub const LINE_RATE: u32 = 6;
pub const LINES_PER_SIDE: u32 = 2;
pub const OFF_RATE: u32 = 5;
pub const FTAB_CHARS: u32 = 2;

fn code(base: u8) -> Option<u8> {
    match base {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_ne_bytes());
}

fn push_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_ne_bytes());
}

/// Unambiguous runs of one sequence as `(gap before, run start, run len)`
fn runs(seq: &[u8]) -> Vec<(u32, u32, u32)> {
    let mut out = Vec::new();
    let mut last_end = 0usize;
    let mut i = 0usize;
    while i < seq.len() {
        if code(seq[i]).is_some() {
            let start = i;
            while i < seq.len() && code(seq[i]).is_some() {
                i += 1;
            }
            out.push(((start - last_end) as u32, start as u32, (i - start) as u32));
            last_end = i;
        } else {
            i += 1;
        }
    }
    if last_end < seq.len() || out.is_empty() {
        out.push(((seq.len() - last_end) as u32, seq.len() as u32, 0));
    }
    out
}

fn ebwt_tot_len(len: u64) -> u64 {
    let side_sz = (1u64 << LINE_RATE) * LINES_PER_SIDE as u64;
    let side_bwt_sz = side_sz - 8;
    let bwt_sz = len / 4 + 1;
    let pairs = (bwt_sz + 2 * side_bwt_sz - 1) / (2 * side_bwt_sz);
    pairs * 2 * side_sz
}

fn primary_file(
    refs: &[(&str, &str)],
    joined_len: u32,
    rstarts: &[[u32; 3]],
    flags: i32,
    length_bias: u32,
) -> Vec<u8> {
    let mut buf = Vec::new();
    push_u32(&mut buf, 1);
    push_u32(&mut buf, joined_len);
    push_u32(&mut buf, LINE_RATE);
    push_u32(&mut buf, LINES_PER_SIDE);
    push_u32(&mut buf, OFF_RATE);
    push_u32(&mut buf, FTAB_CHARS);
    push_i32(&mut buf, flags);

    push_u32(&mut buf, refs.len() as u32);
    for (_, seq) in refs {
        push_u32(&mut buf, seq.len() as u32 - length_bias);
    }
    push_u32(&mut buf, rstarts.len() as u32);
    for triple in rstarts {
        for &v in triple {
            push_u32(&mut buf, v);
        }
    }

    let tables = ebwt_tot_len(joined_len as u64)
        + 4
        + 5 * 4
        + ((1u64 << (FTAB_CHARS * 2)) + 1) * 4
        + FTAB_CHARS as u64 * 2 * 4;
    buf.resize(buf.len() + tables as usize, 0);

    for (name, _) in refs {
        buf.extend_from_slice(name.as_bytes());
        buf.push(b'\n');
    }
    buf.push(0);
    buf
}

/// Write a nucleotide index for `refs` under `dir`, returning its base
///
/// Every byte other than `ACGT` is stored as an ambiguous position.
pub fn write_index(dir: &Path, name: &str, refs: &[(&str, &str)]) -> PathBuf {
    write_index_with(dir, name, refs, false)
}

/// Like [`write_index`], flagging the index as colorspace
///
/// Declared lengths are stored one shorter, as colors.
pub fn write_colorspace_index(dir: &Path, name: &str, refs: &[(&str, &str)]) -> PathBuf {
    write_index_with(dir, name, refs, true)
}

fn write_index_with(dir: &Path, name: &str, refs: &[(&str, &str)], colorspace: bool) -> PathBuf {
    let base = dir.join(name);

    let mut records = Vec::new();
    let mut codes = Vec::new();
    let mut rstarts = Vec::new();
    for (reference, (_, seq)) in refs.iter().enumerate() {
        let seq = seq.as_bytes();
        for (i, (gap, start, len)) in runs(seq).into_iter().enumerate() {
            records.push((gap, len, i == 0));
            if len > 0 {
                rstarts.push([codes.len() as u32, reference as u32, start]);
            }
            for &b in &seq[start as usize..(start + len) as usize] {
                codes.extend(code(b));
            }
        }
    }

    let joined_len = codes.len() as u32;
    let bias = u32::from(colorspace);
    fs::write(
        with_suffix(&base, ".1.ebwt"),
        primary_file(refs, joined_len, &rstarts, encode_flags(colorspace, false), bias),
    )
    .unwrap();
    fs::write(
        with_suffix(&base, ".rev.1.ebwt"),
        primary_file(refs, joined_len, &rstarts, encode_flags(colorspace, true), bias),
    )
    .unwrap();

    let mut three = Vec::new();
    push_u32(&mut three, 1);
    push_u32(&mut three, records.len() as u32);
    for (off, len, first) in records {
        push_u32(&mut three, off);
        push_u32(&mut three, len);
        three.push(first as u8);
    }
    fs::write(with_suffix(&base, ".3.ebwt"), three).unwrap();

    let mut four = vec![0u8; codes.len().div_ceil(4)];
    for (i, &c) in codes.iter().enumerate() {
        four[i >> 2] |= c << ((i & 3) << 1);
    }
    fs::write(with_suffix(&base, ".4.ebwt"), four).unwrap();

    base
}

/// Expected FASTA text for the given records
pub fn fasta(records: &[(&str, &str)], width: Option<usize>) -> String {
    let mut out = String::new();
    for (name, seq) in records {
        out.push('>');
        out.push_str(name);
        out.push('\n');
        match width {
            Some(w) => {
                for line in seq.as_bytes().chunks(w) {
                    out.push_str(std::str::from_utf8(line).unwrap());
                    out.push('\n');
                }
            }
            None if !seq.is_empty() => {
                out.push_str(seq);
                out.push('\n');
            }
            None => {}
        }
    }
    out
}
