use serde::{Deserialize, Serialize};

/// Job description written by the hosting framework
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    pub parameters: Parameters,
    #[serde(default, rename = "input")]
    pub inputs: Vec<InputFile>,
}

/// Parameters chosen by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    pub lang: String,
    /// Run the TICCL normalization stage
    #[serde(default = "default_true")]
    pub ticcl: bool,
    #[serde(default = "default_rank")]
    pub rank: u32,
    #[serde(default = "default_distance")]
    pub distance: u32,
    #[serde(default)]
    pub reassemble: bool,

    #[serde(default)]
    pub frog: bool,
    #[serde(default)]
    pub frog_lemma: bool,
    #[serde(default)]
    pub frog_parser: bool,
    #[serde(default)]
    pub frog_morph: bool,
    #[serde(default)]
    pub frog_ner: bool,
    #[serde(default)]
    pub frog_chunker: bool,

    #[serde(default)]
    pub tok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputclass: Option<String>,
    #[serde(default)]
    pub debug: bool,
}

impl Parameters {
    /// Defaults for a language, as the web interface preselects them
    pub fn for_language(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            ticcl: true,
            rank: default_rank(),
            distance: default_distance(),
            reassemble: false,
            frog: false,
            frog_lemma: false,
            frog_parser: false,
            frog_morph: false,
            frog_ner: false,
            frog_chunker: false,
            tok: false,
            inputclass: None,
            debug: false,
        }
    }
}

/// One uploaded input file and the template it was uploaded under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFile {
    pub filename: String,
    pub inputtemplate: String,
}

impl InputFile {
    pub fn new(filename: impl Into<String>, inputtemplate: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            inputtemplate: inputtemplate.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_rank() -> u32 {
    3
}

fn default_distance() -> u32 {
    2
}
