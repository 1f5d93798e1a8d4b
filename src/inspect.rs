//! Run driver
//!
//! Resolves the index, opens only the files the selected mode needs,
//! and writes the result to the given sink.

use crate::core::{
    IndexMetadataProvider, InspectConfig, InspectMode, ReconstructionEngine,
    ReconstructionStrategy, Result,
};
use crate::formats::{
    resolve_index_base, write_names, write_summary, BitPairReference, EbwtPrimary, FastaWriter,
    JoinedEbwt,
};
use log::info;
use std::io::Write;

/// Execute one run described by `config`, writing text output to `out`
pub fn inspect<W: Write>(config: &InspectConfig, out: &mut W) -> Result<()> {
    let base = resolve_index_base(&config.index_base)?;
    info!("Input index: {}", base.display());

    let primary = EbwtPrimary::open(&base)?;
    info!(
        "{} references in {} fragments, joined length {}",
        primary.reference_names().len(),
        primary.rstarts().len(),
        primary.params().len
    );

    match config.mode {
        InspectMode::Names => {
            write_names(&primary, out)?;
        }
        InspectMode::Summary => {
            write_summary(&primary, out)?;
        }
        InspectMode::Sequences(strategy) => {
            let store = BitPairReference::open(&base)?;
            let engine = ReconstructionEngine::new(config);
            let mut writer = FastaWriter::new(&mut *out, config.line_width);
            let stats = match strategy {
                ReconstructionStrategy::PackedStore => {
                    engine.reconstruct_packed(&primary, &store, &mut writer)?
                }
                ReconstructionStrategy::JoinedTraversal => {
                    let joined = JoinedEbwt::new(&primary, &store)?;
                    engine.reconstruct_joined(&primary, &joined, &mut writer)?
                }
            };
            writer.flush()?;
            info!(
                "Wrote {} records ({} bases, {} placeholders)",
                stats.records, stats.bases, stats.placeholders
            );
        }
    }

    out.flush()?;
    Ok(())
}
