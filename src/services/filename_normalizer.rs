//! Output filename normalization
//!
//! Every pipeline stage appends its own marker to a filename, so a page
//! that went through OCR, TICCL and ucto ends up as
//! `page.ocr.ticcl.tok.folia.xml`. Consumers only understand a three-field
//! tail, so the markers in front of it are removed: `page.tok.folia.xml`.

use phf::phf_set;

/// Tokens stages add to filenames
static STAGE_MARKERS: phf::Set<&'static str> = phf_set! {
    "ocr",
    "ticcl",
    "ticclin",
    "tok",
    "ucto",
    "frog",
    "frogged",
    "folia",
    "xml",
};

/// Number of trailing fields that are never touched
const TAIL_FIELDS: usize = 3;

pub fn is_stage_marker(token: &str) -> bool {
    STAGE_MARKERS.contains(token)
}

/// Strip stage markers between the base identifier and the last three fields
///
/// Idempotent. The first field is the document's identifier and is kept
/// even when it happens to look like a marker.
pub fn normalize_filename(filename: &str) -> String {
    let fields: Vec<&str> = filename.split('.').collect();
    // base identifier plus tail, nothing in between
    if fields.len() <= TAIL_FIELDS + 1 {
        return filename.to_string();
    }

    let (head, tail) = fields.split_at(fields.len() - TAIL_FIELDS);
    let mut kept: Vec<&str> = Vec::with_capacity(fields.len());
    kept.push(head[0]);
    kept.extend(head[1..].iter().copied().filter(|f| !is_stage_marker(f)));
    kept.extend_from_slice(tail);
    kept.join(".")
}
