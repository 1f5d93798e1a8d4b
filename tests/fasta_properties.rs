//! Property-based tests for FASTA line wrapping
//!
//! **Property 4: wrapped lines hold exactly `width` symbols except the last**

use ebwt_inspect::core::LineWidth;
use ebwt_inspect::formats::FastaWriter;
use proptest::prelude::*;

fn arb_bases(max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ACGTN".to_vec()), 0..max)
}

proptest! {
    #[test]
    fn prop_wrapped_line_lengths(seq in arb_bases(500), width in 1usize..100) {
        let mut writer = FastaWriter::new(Vec::new(), LineWidth::from_across(width as i64).unwrap());
        writer.write_record("chr", &seq).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        prop_assert_eq!(lines[0], ">chr");
        let body = &lines[1..];
        prop_assert_eq!(body.len(), seq.len().div_ceil(width));
        if let Some((last, full)) = body.split_last() {
            prop_assert!(full.iter().all(|l| l.len() == width));
            prop_assert!(!last.is_empty() && last.len() <= width);
        }
        prop_assert_eq!(body.concat().into_bytes(), seq);
    }

    #[test]
    fn prop_unwrapped_single_line(seq in arb_bases(3000)) {
        let mut writer = FastaWriter::new(Vec::new(), LineWidth::Unwrapped);
        writer.write_record("chr", &seq).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        prop_assert_eq!(lines.len(), if seq.is_empty() { 1 } else { 2 });
        prop_assert_eq!(lines[1..].concat().into_bytes(), seq);
    }

    #[test]
    fn prop_records_counted(count in 0usize..20) {
        let mut writer = FastaWriter::new(Vec::new(), LineWidth::default());
        for i in 0..count {
            writer.write_record(&format!("r{}", i), b"ACGT").unwrap();
        }
        prop_assert_eq!(writer.records_written(), count);
        let text = String::from_utf8(writer.into_inner()).unwrap();
        prop_assert_eq!(text.matches('>').count(), count);
    }
}
