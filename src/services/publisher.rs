//! Output publication
//!
//! Declared stage outputs are made visible in the output directory as
//! symlinks with absolute targets, under their normalized names. The
//! publisher remembers what it linked so a failed run can take it back.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::services::filename_normalizer::normalize_filename;
use crate::workflow::PublishRule;

pub struct Publisher {
    output_dir: PathBuf,
    published: Vec<PathBuf>,
    sources: BTreeSet<PathBuf>,
}

impl Publisher {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            published: Vec::new(),
            sources: BTreeSet::new(),
        }
    }

    /// Links created so far
    pub fn published(&self) -> &[PathBuf] {
        &self.published
    }

    /// True if anything was published out of `dir`
    pub fn has_published_from(&self, dir: &Path) -> bool {
        self.sources.contains(dir)
    }

    /// Publish the files in `stage_dir` matching any of `rules`
    ///
    /// # Returns
    /// The links created for this stage
    pub fn publish(&mut self, stage_dir: &Path, rules: &[PublishRule]) -> Result<Vec<PathBuf>> {
        if rules.is_empty() {
            return Ok(Vec::new());
        }
        if !stage_dir.is_dir() {
            warn!("Stage output directory {} does not exist", stage_dir.display());
            return Ok(Vec::new());
        }
        fs::create_dir_all(&self.output_dir)?;

        let stage_dir = std::path::absolute(stage_dir)?;
        let mut names: Vec<String> = fs::read_dir(&stage_dir)?
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| rules.iter().any(|r| r.matches(name)))
            .collect();
        names.sort();

        let mut created = Vec::new();
        for name in names {
            let source = stage_dir.join(&name);
            let Some(link) = self.target_for(&name) else {
                warn!("Not publishing {}: output name already taken", source.display());
                continue;
            };
            symlink(&source, &link)?;
            debug!("Published {} -> {}", link.display(), source.display());
            created.push(link.clone());
            self.published.push(link);
        }

        if !created.is_empty() {
            self.sources.insert(stage_dir);
            info!("Published {} file(s)", created.len());
        }
        Ok(created)
    }

    /// Remove every link this publisher created
    pub fn rollback(&mut self) {
        for link in self.published.drain(..) {
            if let Err(e) = fs::remove_file(&link) {
                warn!("Unable to remove {}: {}", link.display(), e);
            }
        }
        self.sources.clear();
    }

    /// Normalized name, falling back to the original name on collision
    fn target_for(&self, name: &str) -> Option<PathBuf> {
        let normalized = self.output_dir.join(normalize_filename(name));
        if fs::symlink_metadata(&normalized).is_err() {
            return Some(normalized);
        }
        let original = self.output_dir.join(name);
        if original != normalized && fs::symlink_metadata(&original).is_err() {
            warn!(
                "{} already exists, keeping original name {}",
                normalized.display(),
                name
            );
            return Some(original);
        }
        None
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
