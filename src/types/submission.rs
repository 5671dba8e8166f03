//! Submission Types
//!
//! The user-submitted text plus its genre/audience/language metadata, and the
//! word counter used to enforce submission bounds. Submissions live for one
//! pipeline run and are never persisted.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximal runs of Unicode word characters (letters, digits, underscore).
/// Deliberately not whitespace splitting: literary text is punctuation-heavy
/// and em-dashes or ellipses must not glue words together.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Count words in raw input text.
///
/// Returns 0 for empty, whitespace-only, and punctuation-only input.
pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

// =============================================================================
// Genre
// =============================================================================

/// Literary genre selection, fixed list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "Fantasía")]
    Fantasia,
    #[serde(rename = "Ciencia Ficción")]
    CienciaFiccion,
    #[serde(rename = "Misterio")]
    Misterio,
    #[serde(rename = "Romance")]
    Romance,
    #[serde(rename = "Terror")]
    Terror,
    #[serde(rename = "Aventura")]
    Aventura,
    #[serde(rename = "Drama")]
    Drama,
    #[serde(rename = "Histórico")]
    Historico,
    #[serde(rename = "Otro")]
    Otro,
}

impl Genre {
    /// Label interpolated verbatim into prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fantasia => "Fantasía",
            Self::CienciaFiccion => "Ciencia Ficción",
            Self::Misterio => "Misterio",
            Self::Romance => "Romance",
            Self::Terror => "Terror",
            Self::Aventura => "Aventura",
            Self::Drama => "Drama",
            Self::Historico => "Histórico",
            Self::Otro => "Otro",
        }
    }

    /// Parse a CLI value (accent-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fantasia" | "fantasía" => Some(Self::Fantasia),
            "ciencia-ficcion" | "ciencia ficción" | "ciencia ficcion" => Some(Self::CienciaFiccion),
            "misterio" => Some(Self::Misterio),
            "romance" => Some(Self::Romance),
            "terror" => Some(Self::Terror),
            "aventura" => Some(Self::Aventura),
            "drama" => Some(Self::Drama),
            "historico" | "histórico" => Some(Self::Historico),
            "otro" => Some(Self::Otro),
            _ => None,
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Language
// =============================================================================

/// Submission language, fixed 6-entry list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
    Fr,
    It,
    De,
    Pt,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
            Self::Fr => "fr",
            Self::It => "it",
            Self::De => "de",
            Self::Pt => "pt",
        }
    }

    /// Native-language name interpolated into prompts
    pub fn name(&self) -> &'static str {
        match self {
            Self::Es => "Español",
            Self::En => "English",
            Self::Fr => "Français",
            Self::It => "Italiano",
            Self::De => "Deutsch",
            Self::Pt => "Português",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "es" => Some(Self::Es),
            "en" => Some(Self::En),
            "fr" => Some(Self::Fr),
            "it" => Some(Self::It),
            "de" => Some(Self::De),
            "pt" => Some(Self::Pt),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// =============================================================================
// Text Submission
// =============================================================================

/// One user submission, created per user action and discarded after the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSubmission {
    pub raw_text: String,
    pub genre: Genre,
    pub audience: String,
    pub language: Language,
}

impl TextSubmission {
    pub fn new(
        raw_text: impl Into<String>,
        genre: Genre,
        audience: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            genre,
            audience: audience.into(),
            language,
        }
    }

    /// Word count of the raw text
    pub fn word_count(&self) -> usize {
        word_count(&self.raw_text)
    }
}

// =============================================================================
// Tests
// =============================================================================
