//! Per-document metadata merge
//!
//! Adds the key/value pairs of `<metadata dir>/<document id>.json` to the
//! `<metadata>` block of a FoLiA document. Documents without a metadata
//! file are passed through as a symlink.

use anyhow::{bail, Context, Result};
use regex::{Captures, Regex};
use std::collections::HashSet;
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What happened to one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Metadata was found and `count` entries written
    Merged { id: String, count: usize },
    /// No metadata file; the output links to the input
    Linked { id: String },
}

/// Document id: the file name up to its first dot
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

pub fn metadata_file(metadata_dir: &Path, id: &str) -> PathBuf {
    metadata_dir.join(format!("{}.json", id))
}

/// Merge metadata into `input`, writing the result to `output`
pub fn merge_metadata(input: &Path, output: &Path, metadata_dir: &Path) -> Result<MergeOutcome> {
    let id = document_id(input);
    let meta_path = metadata_file(metadata_dir, &id);

    if !meta_path.exists() {
        info!("No metadata found for {}", id);
        let target = std::path::absolute(input)?;
        symlink(&target, output)
            .with_context(|| format!("Unable to link {} to {}", output.display(), target.display()))?;
        return Ok(MergeOutcome::Linked { id });
    }

    let raw = fs::read_to_string(&meta_path)
        .with_context(|| format!("Unable to read {}", meta_path.display()))?;
    let entries: Map<String, JsonValue> = serde_json::from_str(&raw)
        .with_context(|| format!("Metadata in {} is not a JSON object", meta_path.display()))?;

    let document = fs::read_to_string(input)
        .with_context(|| format!("Unable to read document {}", input.display()))?;
    let merged = insert_meta(&document, &entries)
        .with_context(|| format!("Unable to add metadata to {}", input.display()))?;

    fs::write(output, merged).with_context(|| format!("Unable to write {}", output.display()))?;

    info!("Added metadata for {}", id);
    Ok(MergeOutcome::Merged {
        id,
        count: entries.len(),
    })
}

/// Write `entries` as `<meta id="...">` elements into the metadata block
///
/// Entries are sorted by key; an existing `<meta>` with the same id is
/// replaced.
pub fn insert_meta(document: &str, entries: &Map<String, JsonValue>) -> Result<String> {
    let open = Regex::new(r"<metadata(\s[^>]*?)?(/?)>")?;
    let Some(caps) = open.captures(document) else {
        bail!("document has no <metadata> element");
    };
    let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
    let self_closing = caps.get(2).is_some_and(|m| m.as_str() == "/");
    let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");

    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();

    let mut block = String::new();
    for key in &keys {
        let value = match &entries[key.as_str()] {
            JsonValue::String(s) => s.clone(),
            JsonValue::Null => String::new(),
            other => other.to_string(),
        };
        block.push_str(&format!(
            "<meta id=\"{}\">{}</meta>",
            escape_xml(key),
            escape_xml(&value)
        ));
    }

    if self_closing {
        let mut out = String::with_capacity(document.len() + block.len() + 16);
        out.push_str(&document[..whole.start]);
        out.push_str(&format!("<metadata{}>{}</metadata>", attrs, block));
        out.push_str(&document[whole.end..]);
        return Ok(out);
    }

    let body_start = whole.end;
    let Some(close_offset) = document[body_start..].find("</metadata>") else {
        bail!("unterminated <metadata> element");
    };
    let body_end = body_start + close_offset;

    let replaced: HashSet<String> = keys.iter().map(|k| escape_xml(k)).collect();
    let existing = Regex::new(r#"(?s)\s*<meta\s+id="([^"]*)"\s*(?:/>|>.*?</meta>)"#)?;
    let body = existing.replace_all(&document[body_start..body_end], |caps: &Captures| {
        if replaced.contains(&caps[1]) {
            String::new()
        } else {
            caps[0].to_string()
        }
    });

    let mut out = String::with_capacity(document.len() + block.len());
    out.push_str(&document[..body_start]);
    out.push_str(&body);
    out.push_str(&block);
    out.push_str(&document[body_end..]);
    Ok(out)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
