//! Pre-flight resolution of per-language support files
//!
//! The normalization stage reads a lexicon, an alphabet and a character
//! confusion list from fixed names in the working directory. They are
//! symlinked from `<data root>/data/int/<language>`, never copied.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{PicclError, Result};
use crate::models::Language;
use crate::workflow::planner::{ALPHABET_LINK, CONFUSION_LINK, LEXICON_LINK};

/// The three support files the normalization stage needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportFile {
    Lexicon,
    Alphabet,
    Confusion,
}

impl SupportFile {
    pub const ALL: [SupportFile; 3] = [
        SupportFile::Lexicon,
        SupportFile::Alphabet,
        SupportFile::Confusion,
    ];

    /// Fixed link name in the working directory
    pub fn link_name(self) -> &'static str {
        match self {
            SupportFile::Lexicon => LEXICON_LINK,
            SupportFile::Alphabet => ALPHABET_LINK,
            SupportFile::Confusion => CONFUSION_LINK,
        }
    }

    /// Extension identifying the file in the language data directory
    pub fn extension(self) -> &'static str {
        match self {
            SupportFile::Lexicon => "dict",
            SupportFile::Alphabet => "chars",
            SupportFile::Confusion => "confusion",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

impl Display for SupportFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SupportFile::Lexicon => "lexicon",
            SupportFile::Alphabet => "alphabet",
            SupportFile::Confusion => "confusion",
        };
        write!(f, "{}", name)
    }
}

/// Links created in the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageAssets {
    pub lexicon: PathBuf,
    pub alphabet: PathBuf,
    pub confusion: PathBuf,
}

/// Directory holding the support files for a language
pub fn language_data_dir(data_root: &Path, language: Language) -> PathBuf {
    data_root.join("data").join("int").join(language.base().code())
}

/// Link the support files for `language` into `work_dir`
///
/// A `lexicon.lst` uploaded with the input takes precedence over the
/// language's own dictionary.
pub fn resolve_language_assets(
    language: Language,
    data_root: &Path,
    work_dir: &Path,
    input_dir: &Path,
) -> Result<LanguageAssets> {
    let data_dir = language_data_dir(data_root, language);
    if !data_dir.is_dir() {
        return Err(PicclError::MissingLanguageData {
            language: language.base().code().to_string(),
            data_root: data_root.to_path_buf(),
        });
    }

    let user_lexicon = input_dir.join(LEXICON_LINK);
    let user_lexicon = user_lexicon.is_file().then_some(user_lexicon);
    if let Some(lexicon) = &user_lexicon {
        info!("Using user-supplied lexicon {}", lexicon.display());
        replace_link(&absolute(lexicon)?, &work_dir.join(LEXICON_LINK));
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(&data_dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        let Some(file) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SupportFile::from_extension)
        else {
            continue;
        };
        if file == SupportFile::Lexicon && user_lexicon.is_some() {
            continue;
        }
        debug!("{} file for {}: {}", file, language, path.display());
        replace_link(&absolute(&path)?, &work_dir.join(file.link_name()));
    }

    for file in SupportFile::ALL {
        if !work_dir.join(file.link_name()).exists() {
            return Err(PicclError::MissingSupportFile {
                file,
                language: language.base().code().to_string(),
                data_root: data_root.to_path_buf(),
            });
        }
    }

    Ok(LanguageAssets {
        lexicon: work_dir.join(LEXICON_LINK),
        alphabet: work_dir.join(ALPHABET_LINK),
        confusion: work_dir.join(CONFUSION_LINK),
    })
}

/// Point `link` at `target`, replacing whatever is there
///
/// Failures are warnings: a link left by an earlier partial run may still
/// satisfy the requirement, which the caller checks afterwards.
fn replace_link(target: &Path, link: &Path) {
    if fs::symlink_metadata(link).is_ok() {
        if let Err(e) = fs::remove_file(link) {
            warn!("Unable to remove existing {}: {}", link.display(), e);
        }
    }
    if let Err(e) = symlink(target, link) {
        warn!(
            "Unable to link {} -> {}: {}",
            link.display(),
            target.display(),
            e
        );
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
