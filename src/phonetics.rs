//! Phonetic transcription of word tokens.
//!
//! Resolution order for a word:
//! 1. Dictionary entry for the normalized word (first variant is canonical)
//! 2. Dictionary entry for a repaired g-dropped form ("runnin" → "running")
//! 3. Dictionary root plus an inflectional suffix ("dreams", "hated", "kissing")
//! 4. Spelling rules ([`crate::g2p`])
//!
//! Transcription is pure given the dictionary, so results are cached per
//! analysis run by normalized word.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::dictionary::PronunciationDictionary;
use crate::g2p::spell_to_phonemes;
use crate::models::{HeuristicSource, Phoneme, PhoneticForm, Stress, Transcription};
use crate::normalize::{normalize_word, restore_dropped_g};

const SIBILANTS: &[&str] = &["S", "Z", "SH", "ZH", "CH", "JH"];
const VOICELESS: &[&str] = &["P", "T", "K", "F", "TH", "S", "SH", "CH"];

/// Per-run transcription cache over a shared read-only dictionary.
pub struct Transcriber<'d> {
    dictionary: &'d PronunciationDictionary,
    cache: FxHashMap<String, Transcription>,
}

impl<'d> Transcriber<'d> {
    pub fn new(dictionary: &'d PronunciationDictionary) -> Self {
        Self {
            dictionary,
            cache: FxHashMap::default(),
        }
    }

    /// Transcribe a surface word. Words with no letters get an empty form.
    pub fn transcribe(&mut self, word: &str) -> Transcription {
        let Some(key) = normalize_word(word) else {
            return Transcription::Heuristic {
                form: PhoneticForm::default(),
                source: HeuristicSource::Spelling,
            };
        };
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let transcription = transcribe_key(self.dictionary, &key);
        trace!(word = %key, source = transcription.source_label(), phonemes = %transcription.form(), "Transcribed");
        self.cache.insert(key, transcription.clone());
        transcription
    }

    /// Number of distinct words transcribed so far.
    pub fn distinct_words(&self) -> usize {
        self.cache.len()
    }
}

/// Transcribe an already-normalized key without caching.
pub fn transcribe_key(dictionary: &PronunciationDictionary, key: &str) -> Transcription {
    if let Some(form) = dictionary.lookup_key(key) {
        return Transcription::Dictionary(form.clone());
    }

    if let Some(restored) = restore_dropped_g(key) {
        if let Some(form) = dictionary.lookup_key(&restored) {
            return Transcription::Heuristic {
                form: form.clone(),
                source: HeuristicSource::Suffix,
            };
        }
        if let Some(form) = derive_from_root(dictionary, &restored) {
            return Transcription::Heuristic {
                form,
                source: HeuristicSource::Suffix,
            };
        }
    }

    if let Some(form) = derive_from_root(dictionary, key) {
        return Transcription::Heuristic {
            form,
            source: HeuristicSource::Suffix,
        };
    }

    debug!(word = %key, "Dictionary miss, using spelling rules");
    Transcription::Heuristic {
        form: spell_to_phonemes(key),
        source: HeuristicSource::Spelling,
    }
}

// ============================================================================
// Suffix Derivation
// ============================================================================

fn last_symbol(form: &PhoneticForm) -> Option<&str> {
    form.phonemes.last().map(|p| p.symbol.as_str())
}

/// Plural / possessive / third person: "-s" after the root.
fn with_sibilant_suffix(root: &PhoneticForm) -> PhoneticForm {
    let mut phonemes = root.phonemes.clone();
    match last_symbol(root) {
        Some(last) if SIBILANTS.contains(&last) => {
            phonemes.push(Phoneme::vowel("IH", Stress::Unstressed));
            phonemes.push(Phoneme::consonant("Z"));
        }
        Some(last) if VOICELESS.contains(&last) => phonemes.push(Phoneme::consonant("S")),
        _ => phonemes.push(Phoneme::consonant("Z")),
    }
    PhoneticForm::new(phonemes)
}

/// Past tense: "-ed" after the root.
fn with_past_suffix(root: &PhoneticForm) -> PhoneticForm {
    let mut phonemes = root.phonemes.clone();
    match last_symbol(root) {
        Some("T" | "D") => {
            phonemes.push(Phoneme::vowel("IH", Stress::Unstressed));
            phonemes.push(Phoneme::consonant("D"));
        }
        Some(last) if VOICELESS.contains(&last) => phonemes.push(Phoneme::consonant("T")),
        _ => phonemes.push(Phoneme::consonant("D")),
    }
    PhoneticForm::new(phonemes)
}

fn with_ing_suffix(root: &PhoneticForm) -> PhoneticForm {
    let mut phonemes = root.phonemes.clone();
    phonemes.push(Phoneme::vowel("IH", Stress::Unstressed));
    phonemes.push(Phoneme::consonant("NG"));
    PhoneticForm::new(phonemes)
}

/// Stem candidates after removing a suffix: the bare stem, the stem with a
/// restored silent "e" ("mak" → "make"), and an undoubled stem ("runn" → "run").
fn stem_candidates(stem: &str) -> Vec<String> {
    let mut candidates = vec![stem.to_string(), format!("{stem}e")];
    let bytes = stem.as_bytes();
    if bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
        candidates.push(stem[..stem.len() - 1].to_string());
    }
    candidates
}

fn lookup_first<'a>(dictionary: &'a PronunciationDictionary, candidates: &[String]) -> Option<&'a PhoneticForm> {
    candidates.iter().find_map(|c| dictionary.lookup_key(c))
}

/// Derive a pronunciation from a dictionary root and an inflectional suffix.
pub fn derive_from_root(dictionary: &PronunciationDictionary, key: &str) -> Option<PhoneticForm> {
    if let Some(root) = key.strip_suffix("'s") {
        if let Some(form) = dictionary.lookup_key(root) {
            return Some(with_sibilant_suffix(form));
        }
    }

    let len = key.len();

    if len > 5 {
        if let Some(stem) = key.strip_suffix("ing") {
            if let Some(form) = lookup_first(dictionary, &stem_candidates(stem)) {
                return Some(with_ing_suffix(form));
            }
        }
    }

    if len > 4 {
        if let Some(stem) = key.strip_suffix("ied") {
            if let Some(form) = dictionary.lookup_key(&format!("{stem}y")) {
                return Some(with_past_suffix(form));
            }
        }
        if let Some(stem) = key.strip_suffix("ed") {
            // "loved" → "love" before "lov"
            let mut candidates = vec![format!("{stem}e")];
            candidates.extend(stem_candidates(stem));
            if let Some(form) = lookup_first(dictionary, &candidates) {
                return Some(with_past_suffix(form));
            }
        }
    }

    if len > 3 && key.ends_with('s') && !key.ends_with("ss") {
        if let Some(stem) = key.strip_suffix("ies") {
            if let Some(form) = dictionary.lookup_key(&format!("{stem}y")) {
                return Some(with_sibilant_suffix(form));
            }
        }
        if let Some(stem) = key.strip_suffix('s') {
            if let Some(form) = dictionary.lookup_key(stem) {
                return Some(with_sibilant_suffix(form));
            }
        }
        if let Some(stem) = key.strip_suffix("es") {
            if let Some(form) = dictionary.lookup_key(stem) {
                return Some(with_sibilant_suffix(form));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = "CAT  K AE1 T
DREAM  D R IY1 M
HATE  HH EY1 T
MAKE  M EY1 K
RUN  R AH1 N
KISS  K IH1 S
CRY  K R AY1
WALK  W AO1 K
LOVE  L AH1 V
NIGHT  N AY1 T
";

    fn dict() -> PronunciationDictionary {
        PronunciationDictionary::from_lexicon(LEXICON).unwrap()
    }

    fn transcribe(word: &str) -> (String, &'static str) {
        let dict = dict();
        let mut transcriber = Transcriber::new(&dict);
        let t = transcriber.transcribe(word);
        (t.form().to_string(), t.source_label())
    }

    #[test]
    fn test_dictionary_hit() {
        assert_eq!(transcribe("Cat"), ("K AE1 T".to_string(), "dictionary"));
    }

    #[test]
    fn test_plural_suffix_voicing() {
        assert_eq!(transcribe("dreams").0, "D R IY1 M Z");
        assert_eq!(transcribe("cats").0, "K AE1 T S");
        assert_eq!(transcribe("kisses").0, "K IH1 S IH0 Z");
        assert_eq!(transcribe("cries").0, "K R AY1 Z");
        assert_eq!(transcribe("dreams").1, "suffix");
    }

    #[test]
    fn test_possessive() {
        assert_eq!(transcribe("night's").0, "N AY1 T S");
    }

    #[test]
    fn test_past_suffix() {
        assert_eq!(transcribe("hated").0, "HH EY1 T IH0 D");
        assert_eq!(transcribe("walked").0, "W AO1 K T");
        assert_eq!(transcribe("loved").0, "L AH1 V D");
        assert_eq!(transcribe("cried").0, "K R AY1 D");
    }

    #[test]
    fn test_ing_suffix() {
        assert_eq!(transcribe("making").0, "M EY1 K IH0 NG");
        assert_eq!(transcribe("running").0, "R AH1 N IH0 NG");
        assert_eq!(transcribe("walking").0, "W AO1 K IH0 NG");
    }

    #[test]
    fn test_dropped_g() {
        assert_eq!(transcribe("runnin'").0, "R AH1 N IH0 NG");
        assert_eq!(transcribe("walkin").1, "suffix");
    }

    #[test]
    fn test_spelling_fallback() {
        let (form, source) = transcribe("blat");
        assert_eq!(source, "spelling");
        assert_eq!(form, "B L AE1 T");
    }

    #[test]
    fn test_no_letters_is_empty() {
        let dict = dict();
        let mut transcriber = Transcriber::new(&dict);
        assert!(transcriber.transcribe("1999").form().is_empty());
        assert_eq!(transcriber.distinct_words(), 0);
    }

    #[test]
    fn test_cache_dedupes_case() {
        let dict = dict();
        let mut transcriber = Transcriber::new(&dict);
        let a = transcriber.transcribe("NIGHT");
        let b = transcriber.transcribe("night");
        assert_eq!(a, b);
        assert_eq!(transcriber.distinct_words(), 1);
    }
}
