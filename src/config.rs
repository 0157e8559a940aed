//! Analyzer configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. CLI flags are applied on top of the file values.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Color palette assigned to rhyme clusters in first-appearance order.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#FFFF00", // Yellow
    "#FF1493", // Deep pink
    "#00FFFF", // Cyan
    "#FF4500", // Orange red
    "#32CD32", // Lime green
    "#FF69B4", // Hot pink
    "#00CED1", // Dark turquoise
    "#FFD700", // Gold
    "#BA55D3", // Medium orchid
    "#00FA9A", // Medium spring green
    "#FF6347", // Tomato
    "#1E90FF", // Dodger blue
    "#FFA500", // Orange
    "#8A2BE2", // Blue violet
    "#00FF7F", // Spring green
    "#DC143C", // Crimson
    "#20B2AA", // Light sea green
    "#FF00FF", // Magenta
    "#7FFF00", // Chartreuse
    "#00BFFF", // Deep sky blue
];

/// Articles and short connectors that never carry a rhyme.
pub const DEFAULT_STOPWORDS: &[&str] = &["a", "the", "an", "and", "or", "of", "to", "in", "it", "is"];

/// How coda consonants are folded before keys are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CodaFolding {
    /// Codas must match phoneme for phoneme
    Exact,
    /// Voiced and voiceless pairs are equal (T/D, S/Z, K/G, ...)
    #[default]
    Voicing,
    /// Consonants of the same manner class are equal (M/N/NG, P/T/K/B/D/G, ...)
    Manner,
}

/// Which keys a new syllable is compared against when no exact key matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Only the key that created each cluster
    #[default]
    Representative,
    /// Every key a cluster has absorbed; clusters bridged by one key merge
    Transitive,
}

/// Which syllables of a word take part in clustering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SyllableScope {
    /// Only the final syllable of each word
    #[default]
    Final,
    /// Every syllable, for internal and multi-syllable rhymes
    All,
}

/// Near-rhyme tolerance settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub coda_folding: CodaFolding,
    /// Extra phoneme edits allowed between folded codas sharing a nucleus
    pub max_coda_edits: usize,
    pub policy: MatchPolicy,
}

impl Tolerance {
    pub fn exact() -> Self {
        Self {
            coda_folding: CodaFolding::Exact,
            max_coda_edits: 0,
            policy: MatchPolicy::Representative,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub tolerance: Tolerance,
    pub scope: SyllableScope,
    pub stopwords: Vec<String>,
    /// Words shorter than this (in letters) never rhyme
    pub min_word_len: usize,
    pub palette: Vec<String>,
    /// Scheme label for lines whose ending doesn't rhyme
    pub placeholder: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            scope: SyllableScope::default(),
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            min_word_len: 2,
            palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            placeholder: "-".to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|source| ConfigError::Json {
            source,
            path: path.to_path_buf(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette must contain at least one color".to_string()));
        }
        if self.placeholder.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Invalid(format!(
                "placeholder \"{}\" could be mistaken for a scheme letter",
                self.placeholder
            )));
        }
        Ok(())
    }
}
