use phf::phf_map;

use crate::error::{PicclError, Result};

/// Supported document languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Eng,
    Nld,
    Fin,
    Fra,
    Deu,
    /// German set in Fraktur; German for every purpose except OCR
    DeuFrak,
    Ell,
    Grc,
    Isl,
    Ita,
    Lat,
    Pol,
    Por,
    Rus,
    Spa,
    Swe,
}

static LANGUAGES: phf::Map<&'static str, Language> = phf_map! {
    "eng" => Language::Eng,
    "nld" => Language::Nld,
    "fin" => Language::Fin,
    "fra" => Language::Fra,
    "deu" => Language::Deu,
    "deu_frak" => Language::DeuFrak,
    "deu-frak" => Language::DeuFrak,
    "ell" => Language::Ell,
    "grc" => Language::Grc,
    "isl" => Language::Isl,
    "ita" => Language::Ita,
    "lat" => Language::Lat,
    "pol" => Language::Pol,
    "por" => Language::Por,
    "rus" => Language::Rus,
    "spa" => Language::Spa,
    "swe" => Language::Swe,
};

impl Language {
    pub const ALL: [Language; 16] = [
        Language::Eng,
        Language::Nld,
        Language::Fin,
        Language::Fra,
        Language::Deu,
        Language::DeuFrak,
        Language::Ell,
        Language::Grc,
        Language::Isl,
        Language::Ita,
        Language::Lat,
        Language::Pol,
        Language::Por,
        Language::Rus,
        Language::Spa,
        Language::Swe,
    ];

    /// Parse a language code as chosen in the web interface
    pub fn from_code(code: &str) -> Result<Self> {
        LANGUAGES
            .get(code.trim())
            .copied()
            .ok_or_else(|| PicclError::UnsupportedLanguage(code.to_string()))
    }

    /// Code handed to the OCR engine
    pub fn code(self) -> &'static str {
        match self {
            Language::Eng => "eng",
            Language::Nld => "nld",
            Language::Fin => "fin",
            Language::Fra => "fra",
            Language::Deu => "deu",
            Language::DeuFrak => "deu_frak",
            Language::Ell => "ell",
            Language::Grc => "grc",
            Language::Isl => "isl",
            Language::Ita => "ita",
            Language::Lat => "lat",
            Language::Pol => "pol",
            Language::Por => "por",
            Language::Rus => "rus",
            Language::Spa => "spa",
            Language::Swe => "swe",
        }
    }

    /// Language used for data lookups and tokenisation
    pub fn base(self) -> Self {
        match self {
            Language::DeuFrak => Language::Deu,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Eng => "English",
            Language::Nld => "Dutch",
            Language::Fin => "Finnish",
            Language::Fra => "French",
            Language::Deu => "German",
            Language::DeuFrak => "German Fraktur",
            Language::Ell => "Greek (Modern)",
            Language::Grc => "Greek (Classical)",
            Language::Isl => "Icelandic",
            Language::Ita => "Italian",
            Language::Lat => "Latin",
            Language::Pol => "Polish",
            Language::Por => "Portuguese",
            Language::Rus => "Russian",
            Language::Spa => "Spanish",
            Language::Swe => "Swedish",
        }
    }

    /// Linguistic enrichment (Frog) only exists for Dutch
    pub fn supports_enrichment(self) -> bool {
        self.base() == Language::Nld
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
