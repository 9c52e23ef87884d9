//! Merge per-document JSON metadata into a FoLiA document
//!
//! usage: addmetadata INPUT OUTPUT METADATADIR

use std::path::PathBuf;

use anyhow::{bail, Result};
use piccl_service::services::{merge_metadata, MergeOutcome};
use piccl_service::utils::logging;
use tracing::info;

fn main() -> Result<()> {
    logging::init(false);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input, output, metadata_dir] = args.as_slice() else {
        bail!("usage: addmetadata INPUT OUTPUT METADATADIR");
    };

    let outcome = merge_metadata(
        &PathBuf::from(input),
        &PathBuf::from(output),
        &PathBuf::from(metadata_dir),
    )?;

    match outcome {
        MergeOutcome::Merged { id, count } => info!("{}: {} metadata field(s) written", id, count),
        MergeOutcome::Linked { id } => info!("{}: linked unchanged", id),
    }
    Ok(())
}
