use std::path::PathBuf;

use thiserror::Error;

use crate::services::language_assets::SupportFile;
use crate::workflow::StageKind;

/// Process exit codes reported to the hosting framework
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// A stage's external invocation failed
    pub const STAGE_FAILED: i32 = 1;
    /// Anything not covered by the other codes
    pub const UNEXPECTED: i32 = 2;
    /// Per-language support data is missing
    pub const MISSING_LANGUAGE_DATA: i32 = 4;
    /// The input type could not be determined
    pub const UNRESOLVABLE_INPUT_TYPE: i32 = 5;
}

/// Errors raised while preparing or running a pipeline job
#[derive(Error, Debug)]
pub enum PicclError {
    /// No data directory exists for the language
    #[error("Unable to find data files for language '{language}' in path {}", data_root.display())]
    MissingLanguageData { language: String, data_root: PathBuf },

    /// One of the lexicon/alphabet/confusion files could not be resolved
    #[error("Unable to find {file} file for language '{language}' in path {}", data_root.display())]
    MissingSupportFile {
        file: SupportFile,
        language: String,
        data_root: PathBuf,
    },

    /// The language code is not one we ship data for
    #[error("Unsupported language '{0}'")]
    UnsupportedLanguage(String),

    /// Input templates gave no single recognized input type
    #[error("Unable to deduce input type on the basis of input files")]
    UnresolvableInputType,

    /// The external pipeline exited non-zero
    #[error("{stage} pipeline failed ({status})")]
    StageFailed { stage: StageKind, status: String },

    /// The external pipeline could not be started at all
    #[error("Unable to launch {stage} pipeline: {source}")]
    StageLaunch {
        stage: StageKind,
        #[source]
        source: std::io::Error,
    },

    /// A parameter has a value outside its domain
    #[error("Invalid value for parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// The settings file could not be read or parsed
    #[error("Unable to load settings from {}: {message}", path.display())]
    Settings { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PicclError {
    /// Exit code the wrapper process terminates with for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PicclError::MissingLanguageData { .. }
            | PicclError::MissingSupportFile { .. }
            | PicclError::UnsupportedLanguage(_) => exit_code::MISSING_LANGUAGE_DATA,
            PicclError::UnresolvableInputType => exit_code::UNRESOLVABLE_INPUT_TYPE,
            PicclError::StageFailed { .. } | PicclError::StageLaunch { .. } => {
                exit_code::STAGE_FAILED
            }
            PicclError::InvalidParameter { .. }
            | PicclError::Settings { .. }
            | PicclError::Io(_) => exit_code::UNEXPECTED,
        }
    }

    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        PicclError::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// True for failures that happen before any stage has been launched
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PicclError::MissingLanguageData { .. }
                | PicclError::MissingSupportFile { .. }
                | PicclError::UnsupportedLanguage(_)
                | PicclError::UnresolvableInputType
        )
    }
}

/// Library result type
pub type Result<T> = std::result::Result<T, PicclError>;
