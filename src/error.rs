//! Error types for lyric analysis.
//!
//! Only input validation and startup loading can fail. Transcription and
//! syllabification degrade to empty forms instead of returning errors.

use std::path::PathBuf;

use thiserror::Error;

/// Library result type alias
pub type Result<T> = std::result::Result<T, AnalyzeError>;

/// Errors returned by [`crate::analyze::Analyzer::analyze`].
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Input was empty or contained no alphabetic characters.
    /// Callers should map this to a client-side (4xx) failure.
    #[error("Malformed lyrics input: {reason}")]
    MalformedInput {
        /// Why the input was rejected.
        reason: &'static str,
    },

    /// Analyzer configuration was rejected before any input was read.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading a pronunciation dictionary at startup.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Dictionary file could not be read
    #[error("IO error reading dictionary at {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    /// A lexicon line could not be parsed
    #[error("Dictionary parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Lexicon contained no usable entries
    #[error("Pronunciation dictionary contained no entries")]
    Empty,
}

/// Errors raised while loading analyzer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config at {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid config JSON in {path:?}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_message() {
        let err = AnalyzeError::MalformedInput {
            reason: "lyrics are empty",
        };
        assert_eq!(err.to_string(), "Malformed lyrics input: lyrics are empty");
    }

    #[test]
    fn test_parse_error_mentions_line() {
        let err = DictionaryError::Parse {
            line: 12,
            message: "missing phonemes".to_string(),
        };
        assert!(err.to_string().contains("line 12"));
    }
}
