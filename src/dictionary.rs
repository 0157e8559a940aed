//! Pronunciation dictionary in CMU format.
//!
//! Loaded once at startup and read-only afterwards, so a single instance can
//! be shared by any number of concurrent analyses without locking. The
//! bundled lexicon covers common lyric vocabulary; a full CMU dictionary can
//! be loaded from disk with [`PronunciationDictionary::from_path`].

use std::path::Path;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::error::DictionaryError;
use crate::models::{Phoneme, PhoneticForm};
use crate::normalize::normalize_word;

const BUNDLED_LEXICON: &str = include_str!("../assets/lexicon.txt");

/// Shared dictionary instance backed by the bundled lexicon.
/// A broken bundled lexicon is a build defect, so initialization panics.
pub static DEFAULT_DICTIONARY: Lazy<PronunciationDictionary> = Lazy::new(|| {
    PronunciationDictionary::from_lexicon(BUNDLED_LEXICON)
        .unwrap_or_else(|err| panic!("failed to initialize bundled pronunciation dictionary: {err}"))
});

/// Pronunciations keyed by normalized (lowercase) word.
#[derive(Debug, Clone, Default)]
pub struct PronunciationDictionary {
    entries: FxHashMap<String, Vec<PhoneticForm>>,
}

impl PronunciationDictionary {
    /// Parse CMU-style lexicon text: `WORD  PH1 PH2 ...`, one entry per line.
    /// Alternates (`WORD(2)`) are appended after the canonical entry.
    pub fn from_lexicon(data: &str) -> Result<Self, DictionaryError> {
        let mut entries: FxHashMap<String, Vec<PhoneticForm>> = FxHashMap::default();

        for (idx, line) in data.lines().enumerate() {
            let line_no = idx + 1;
            // Newer cmudict releases carry inline "# comment" annotations
            let trimmed = line.split_once(" #").map_or(line, |(entry, _)| entry).trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let raw_word = parts.next().ok_or_else(|| DictionaryError::Parse {
                line: line_no,
                message: "missing word column".to_string(),
            })?;

            // Entries like "U.S." or "!EXCLAMATION-POINT" must not shadow a plain word
            let Some(key) = entry_key(trim_variant(raw_word)) else {
                continue;
            };

            let mut phonemes = Vec::new();
            for symbol in parts {
                let phoneme = Phoneme::parse(symbol).ok_or_else(|| DictionaryError::Parse {
                    line: line_no,
                    message: format!("invalid phoneme \"{symbol}\" for {raw_word}"),
                })?;
                phonemes.push(phoneme);
            }
            if phonemes.is_empty() {
                return Err(DictionaryError::Parse {
                    line: line_no,
                    message: format!("missing phoneme sequence for {raw_word}"),
                });
            }

            entries.entry(key).or_default().push(PhoneticForm::new(phonemes));
        }

        if entries.is_empty() {
            return Err(DictionaryError::Empty);
        }

        Ok(Self { entries })
    }

    /// Load a lexicon file from disk.
    pub fn from_path(path: &Path) -> Result<Self, DictionaryError> {
        let data = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        let dictionary = Self::from_lexicon(&data)?;
        info!(
            path = %path.display(),
            words = dictionary.len(),
            "Loaded pronunciation dictionary"
        );
        Ok(dictionary)
    }

    /// Returns a handle to the globally shared bundled dictionary.
    pub fn shared() -> &'static Self {
        &DEFAULT_DICTIONARY
    }

    /// All pronunciations for a word, canonical first.
    pub fn variants(&self, word: &str) -> Option<&[PhoneticForm]> {
        let key = normalize_word(word)?;
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// The canonical (first) pronunciation of a word.
    pub fn lookup(&self, word: &str) -> Option<&PhoneticForm> {
        self.variants(word).and_then(<[PhoneticForm]>::first)
    }

    /// Lookup by an already-normalized key, skipping normalization.
    pub fn lookup_key(&self, key: &str) -> Option<&PhoneticForm> {
        self.entries.get(key).and_then(|v| v.first())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercased headword, or None when it holds anything but letters and
/// apostrophes.
fn entry_key(word: &str) -> Option<String> {
    let valid = word.chars().any(|c| c.is_ascii_alphabetic())
        && word.chars().all(|c| c.is_ascii_alphabetic() || c == '\'');
    valid.then(|| word.to_ascii_lowercase())
}

fn trim_variant(raw_word: &str) -> &str {
    raw_word
        .split_once('(')
        .map(|(base, _)| base)
        .unwrap_or(raw_word)
}
