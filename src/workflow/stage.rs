//! Stage descriptors
//!
//! A [`StageSpec`] describes one external pipeline invocation; the planner
//! produces them and the runner executes them.

use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitStatus;

/// The four pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    Ocr,
    Normalization,
    Enrichment,
    Tokenization,
}

impl StageKind {
    /// Short name used for log files
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Ocr => "ocr",
            StageKind::Normalization => "ticcl",
            StageKind::Enrichment => "frog",
            StageKind::Tokenization => "tokenize",
        }
    }

    /// Pipeline entry point
    pub fn script(self) -> &'static str {
        match self {
            StageKind::Ocr => "ocr.nf",
            StageKind::Normalization => "ticcl.nf",
            StageKind::Enrichment => "frog.nf",
            StageKind::Tokenization => "tokenize.nf",
        }
    }

    /// Directory in the working directory the stage writes to
    pub fn output_dir(self) -> &'static str {
        match self {
            StageKind::Ocr => "ocr_output",
            StageKind::Normalization => "ticcl_out",
            StageKind::Enrichment => "frog_outputdir",
            StageKind::Tokenization => "tok_outputdir",
        }
    }

    /// Status message and completion percentage reported when the stage starts
    pub fn status(self) -> (&'static str, u8) {
        match self {
            StageKind::Ocr => ("Running OCR Pipeline", 1),
            StageKind::Normalization => ("Running TICCL Pipeline", 50),
            StageKind::Enrichment => ("Running Frog Pipeline (linguistic enrichment)", 75),
            StageKind::Tokenization => ("Running Tokeniser (ucto)", 75),
        }
    }

    pub fn stdout_log(self) -> String {
        format!("{}.nextflow.out.log", self.name())
    }

    pub fn stderr_log(self) -> String {
        format!("{}.nextflow.err.log", self.name())
    }
}

impl Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StageKind::Ocr => "OCR",
            StageKind::Normalization => "TICCL",
            StageKind::Enrichment => "Frog",
            StageKind::Tokenization => "Tokeniser",
        };
        write!(f, "{}", label)
    }
}

/// Named layer of a document that carries the text to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextClass {
    /// Text produced by the OCR stage
    Ocr,
    /// The document's current/primary layer
    Current,
    /// A class declared by the user
    Named(String),
}

impl TextClass {
    pub fn as_str(&self) -> &str {
        match self {
            TextClass::Ocr => "OCR",
            TextClass::Current => "current",
            TextClass::Named(name) => name,
        }
    }
}

impl Display for TextClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output files a stage declares for publication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishRule {
    /// Processed FoLiA documents
    FoliaDocuments,
    /// TICCL's ranked list of correction candidates
    RankedVariants,
}

impl PublishRule {
    pub fn matches(self, filename: &str) -> bool {
        match self {
            PublishRule::FoliaDocuments => filename.ends_with(".folia.xml"),
            PublishRule::RankedVariants => filename.ends_with(".ranked"),
        }
    }
}

/// One planned external pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSpec {
    pub kind: StageKind,
    pub input_dir: PathBuf,
    /// Relative to the working directory
    pub output_dir: PathBuf,
    /// Pipeline parameters, without the launcher and trace flags
    pub args: Vec<String>,
    pub publish: Vec<PublishRule>,
}

impl StageSpec {
    /// Value following `flag` in the argument list
    pub fn arg(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

/// Outcome of one executed stage
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage_name: StageKind,
    pub output_directory: PathBuf,
    pub exit_success: bool,
    pub status: ExitStatus,
    pub stdout_log: String,
    pub stderr_log: String,
}
