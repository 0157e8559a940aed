//! Core data models for rhyme analysis.
//!
//! This module contains the struct definitions, index aliases, and enums
//! shared by every stage of the analysis pipeline. Cross references between
//! entities (syllable to word, syllable to cluster) are plain indices into
//! arena vectors owned by a single analysis run.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

// ============================================================================
// Index Aliases
// ============================================================================

/// Index of a [`WordToken`] in the per-run word arena.
pub type WordId = usize;

/// Index of a [`Syllable`] in the per-run syllable arena.
pub type SyllableId = usize;

/// Stable identity of a [`RhymeCluster`], assigned at creation.
pub type ClusterId = usize;

// ============================================================================
// Tokens
// ============================================================================

/// One whitespace-delimited token of a lyric line.
///
/// `word` never contains leading or trailing punctuation, so phonetic
/// analysis only ever sees the word itself. Internal characters such as the
/// apostrophe in "don't" are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WordToken {
    pub word: String,
    pub leading: String,
    pub trailing: String,
    pub line: usize,
    pub position: usize,
}

impl WordToken {
    /// Rebuild the original surface text of the token.
    pub fn surface(&self) -> String {
        let mut s = String::with_capacity(self.leading.len() + self.word.len() + self.trailing.len());
        s.push_str(&self.leading);
        s.push_str(&self.word);
        s.push_str(&self.trailing);
        s
    }

    /// Punctuation-only tokens (e.g. a lone "--") have an empty word.
    pub fn has_word(&self) -> bool {
        !self.word.is_empty()
    }
}

/// Ordered tokens of one input line. Blank lines have no words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LyricLine {
    pub index: usize,
    pub words: Vec<WordToken>,
    /// Section label such as "[Chorus]"; its words never rhyme
    pub section_header: bool,
}

impl LyricLine {
    pub fn is_blank(&self) -> bool {
        self.words.is_empty()
    }
}

// ============================================================================
// Phonetics
// ============================================================================

/// ARPAbet vowel symbols (stress digit stripped).
pub const VOWELS: &[&str] = &[
    "AA", "AE", "AH", "AO", "AW", "AY", "EH", "ER", "EY", "IH", "IY", "OW", "OY", "UH", "UW",
];

/// Vowel stress level as encoded by the trailing digit of ARPAbet vowels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Stress {
    Unstressed,
    Primary,
    Secondary,
}

impl Stress {
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(Stress::Unstressed),
            '1' => Some(Stress::Primary),
            '2' => Some(Stress::Secondary),
            _ => None,
        }
    }

    pub fn digit(self) -> char {
        match self {
            Stress::Unstressed => '0',
            Stress::Primary => '1',
            Stress::Secondary => '2',
        }
    }
}

/// A single phoneme. Vowels carry a stress level, consonants never do.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Phoneme {
    pub symbol: String,
    pub stress: Option<Stress>,
}

impl Phoneme {
    /// Parse an ARPAbet token such as `AE1` or `T`.
    /// Returns None for empty or non-alphabetic symbols.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (base, stress) = match raw.chars().last() {
            Some(c) if c.is_ascii_digit() => (&raw[..raw.len() - 1], Stress::from_digit(c)),
            _ => (raw, None),
        };
        if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let symbol = base.to_ascii_uppercase();
        // Vowels without an explicit digit are treated as unstressed
        let stress = if is_vowel_symbol(&symbol) {
            Some(stress.unwrap_or(Stress::Unstressed))
        } else {
            None
        };
        Some(Self { symbol, stress })
    }

    pub fn consonant(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            stress: None,
        }
    }

    pub fn vowel(symbol: &str, stress: Stress) -> Self {
        Self {
            symbol: symbol.to_string(),
            stress: Some(stress),
        }
    }

    pub fn is_vowel(&self) -> bool {
        is_vowel_symbol(&self.symbol)
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stress {
            Some(stress) => write!(f, "{}{}", self.symbol, stress.digit()),
            None => f.write_str(&self.symbol),
        }
    }
}

pub fn is_vowel_symbol(symbol: &str) -> bool {
    VOWELS.contains(&symbol)
}

/// Ordered phonemes of one word. Empty when the word could not be transcribed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhoneticForm {
    pub phonemes: Vec<Phoneme>,
}

impl PhoneticForm {
    pub fn new(phonemes: Vec<Phoneme>) -> Self {
        Self { phonemes }
    }

    /// Parse a whitespace-separated ARPAbet sequence, skipping invalid symbols.
    pub fn parse(arpabet: &str) -> Self {
        Self {
            phonemes: arpabet.split_whitespace().filter_map(Phoneme::parse).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }

    pub fn vowel_count(&self) -> usize {
        self.phonemes.iter().filter(|p| p.is_vowel()).count()
    }
}

impl fmt::Display for PhoneticForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.phonemes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

/// How a heuristic transcription was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HeuristicSource {
    /// Dictionary root plus an inflectional suffix ("dreams" from "dream")
    Suffix,
    /// Spelling-based grapheme-to-phoneme rules
    Spelling,
}

/// Result of transcribing one word. Both variants are consumed identically
/// downstream through [`Transcription::form`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transcription {
    Dictionary(PhoneticForm),
    Heuristic {
        form: PhoneticForm,
        source: HeuristicSource,
    },
}

impl Transcription {
    pub fn form(&self) -> &PhoneticForm {
        match self {
            Transcription::Dictionary(form) => form,
            Transcription::Heuristic { form, .. } => form,
        }
    }

    pub fn is_dictionary(&self) -> bool {
        matches!(self, Transcription::Dictionary(_))
    }

    /// Short label for logs and the `pronounce` tool.
    pub fn source_label(&self) -> &'static str {
        match self {
            Transcription::Dictionary(_) => "dictionary",
            Transcription::Heuristic {
                source: HeuristicSource::Suffix,
                ..
            } => "suffix",
            Transcription::Heuristic {
                source: HeuristicSource::Spelling,
                ..
            } => "spelling",
        }
    }
}

// ============================================================================
// Syllables and Rhyme Keys
// ============================================================================

/// Normalized nucleus + coda signature used for rhyme comparison.
/// The nucleus has its stress stripped; onset is never part of the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RhymeKey {
    pub nucleus: String,
    pub coda: Vec<String>,
}

impl fmt::Display for RhymeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.nucleus, self.coda.join(""))
    }
}

/// One syllable of a word's phonetic form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Syllable {
    pub word: WordId,
    /// Position of the syllable within its word
    pub index: usize,
    pub onset: Vec<Phoneme>,
    pub nucleus: Phoneme,
    pub coda: Vec<Phoneme>,
    pub key: RhymeKey,
    /// Written once, from None to the owning cluster
    pub cluster: Option<ClusterId>,
}

impl Syllable {
    pub fn stress(&self) -> Stress {
        self.nucleus.stress.unwrap_or(Stress::Unstressed)
    }

    pub fn phonemes(&self) -> impl Iterator<Item = &Phoneme> {
        self.onset
            .iter()
            .chain(std::iter::once(&self.nucleus))
            .chain(self.coda.iter())
    }
}

/// Set of syllables judged to rhyme with one another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RhymeCluster {
    pub id: ClusterId,
    /// Key of the syllable that created the cluster
    pub representative: RhymeKey,
    /// Every distinct key the cluster has absorbed, in order of arrival
    pub keys: Vec<RhymeKey>,
    pub members: Vec<SyllableId>,
    pub first_line: usize,
    pub letter: Option<String>,
    pub color: Option<String>,
}

impl RhymeCluster {
    pub fn new(id: ClusterId, key: RhymeKey, first_member: SyllableId, first_line: usize) -> Self {
        Self {
            id,
            representative: key.clone(),
            keys: vec![key],
            members: vec![first_member],
            first_line,
            letter: None,
            color: None,
        }
    }

    /// Clusters with fewer than two members are treated as "no rhyme".
    pub fn qualifies(&self) -> bool {
        self.members.len() >= 2
    }
}

/// Arena of everything derived from one lyric submission.
#[derive(Clone, Debug, Default)]
pub struct Song {
    pub lines: Vec<LyricLine>,
    pub words: Vec<WordToken>,
    /// Word index range for each line
    pub line_words: Vec<Range<WordId>>,
    /// Transcription per word; None for words that are never transcribed
    pub transcriptions: Vec<Option<Transcription>>,
    pub syllables: Vec<Syllable>,
    /// Syllable index range for each word
    pub word_syllables: Vec<Range<SyllableId>>,
    /// Whether each word takes part in clustering
    pub rhyme_bearing: Vec<bool>,
}

impl Song {
    pub fn syllables_of(&self, word: WordId) -> &[Syllable] {
        &self.syllables[self.word_syllables[word].clone()]
    }
}

// ============================================================================
// Output Models
// ============================================================================

/// Surface text of one syllable with its cluster color, if it rhymes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyllablePart {
    pub text: String,
    pub color: Option<String>,
    pub cluster: Option<ClusterId>,
}

/// A word with its punctuation and per-syllable styling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnnotatedWord {
    pub word: String,
    pub leading: String,
    pub punctuation: String,
    pub syllables: Vec<SyllablePart>,
}

impl AnnotatedWord {
    /// Original token text: leading punctuation, word, trailing punctuation.
    pub fn surface(&self) -> String {
        format!("{}{}{}", self.leading, self.word, self.punctuation)
    }
}

/// Summary of one qualifying rhyme cluster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClusterReport {
    pub id: ClusterId,
    pub key: String,
    pub letter: Option<String>,
    pub color: String,
    pub first_line: usize,
    /// Members formatted as `word[syllable_index]@line`
    pub members: Vec<String>,
}

/// Final composed analysis, index-aligned with input lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub lines: Vec<Vec<AnnotatedWord>>,
    pub scheme: Vec<String>,
    pub clusters: Vec<ClusterReport>,
}

impl AnalysisResult {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
