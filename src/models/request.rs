//! Resolved run request
//!
//! Built once from the job parameters; every policy decision about which
//! features are active is taken here so that planning only reads flags.

use tracing::warn;

use crate::error::{PicclError, Result};
use crate::models::language::Language;
use crate::models::settings::Parameters;

/// Frog sub-features the user asked for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentOptions {
    pub lemmatizer: bool,
    pub parser: bool,
    pub morphology: bool,
    pub ner: bool,
    pub chunker: bool,
}

impl EnrichmentOptions {
    pub fn from_parameters(p: &Parameters) -> Self {
        Self {
            lemmatizer: p.frog_lemma,
            parser: p.frog_parser,
            morphology: p.frog_morph,
            ner: p.frog_ner,
            chunker: p.frog_chunker,
        }
    }

    pub fn any(&self) -> bool {
        self.lemmatizer || self.parser || self.morphology || self.ner || self.chunker
    }

    /// Frog `--skip` letters for every disabled sub-feature
    ///
    /// Part-of-speech tagging has no letter and can never be skipped. The
    /// parser depends on multi-word units, so both go together.
    pub fn skip_instruction(&self) -> Option<String> {
        let mut skip = String::new();
        if !self.lemmatizer {
            skip.push('l');
        }
        if !self.morphology {
            skip.push('a');
        }
        if !self.ner {
            skip.push('n');
        }
        if !self.parser {
            skip.push_str("mp");
        }
        if !self.chunker {
            skip.push('c');
        }
        (!skip.is_empty()).then_some(skip)
    }
}

/// Everything the planner needs to know about a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub language: Language,
    pub enable_normalization: bool,
    /// Resolved enrichment; `None` when Frog will not run
    pub frog: Option<EnrichmentOptions>,
    pub enable_tokenization: bool,
    pub reassemble_pages: bool,
    pub rank_count: u32,
    pub edit_distance: u32,
    /// Text class declared by the user for pre-OCR'd input
    pub input_class: Option<String>,
    pub debug: bool,
}

impl RunRequest {
    pub fn from_parameters(p: &Parameters) -> Result<Self> {
        let language = Language::from_code(&p.lang)?;

        if p.rank == 0 {
            return Err(PicclError::invalid_parameter("rank", "must be a positive integer"));
        }
        if p.distance == 0 {
            return Err(PicclError::invalid_parameter("distance", "must be a positive integer"));
        }

        let options = EnrichmentOptions::from_parameters(p);
        let frog = resolve_enrichment(language, p.frog, options);

        let input_class = p
            .inputclass
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(Self {
            language,
            enable_normalization: p.ticcl,
            frog,
            enable_tokenization: p.tok,
            reassemble_pages: p.reassemble,
            rank_count: p.rank,
            edit_distance: p.distance,
            input_class,
            debug: p.debug,
        })
    }

    pub fn frog_enabled(&self) -> bool {
        self.frog.is_some()
    }
}

/// Decide whether Frog runs
///
/// Sub-flags imply the feature. Non-Dutch runs never get Frog: the request
/// is dropped with a warning, not rejected.
fn resolve_enrichment(
    language: Language,
    requested: bool,
    options: EnrichmentOptions,
) -> Option<EnrichmentOptions> {
    if !requested && !options.any() {
        return None;
    }
    if !language.supports_enrichment() {
        warn!(
            "Linguistic enrichment requested for non-Dutch document (language {}), ignoring",
            language
        );
        return None;
    }
    Some(options)
}
