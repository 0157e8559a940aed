//! Analysis entry point: lyrics text in, annotated result out.
//!
//! One call runs the whole pipeline on call-local state. The only shared
//! input is the read-only pronunciation dictionary, so an [`Analyzer`] can be
//! used from many threads at once.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::cluster::cluster_song;
use crate::compose::compose;
use crate::config::AnalyzerConfig;
use crate::dictionary::PronunciationDictionary;
use crate::error::{ConfigError, Result};
use crate::models::{AnalysisResult, Song, WordToken};
use crate::normalize::normalize_word;
use crate::phonetics::Transcriber;
use crate::scheme::{assign_colors, assign_scheme};
use crate::syllabify::syllabify;
use crate::tokenize::tokenize;

pub struct Analyzer<'d> {
    config: AnalyzerConfig,
    dictionary: &'d PronunciationDictionary,
    stopwords: FxHashSet<String>,
}

impl Analyzer<'static> {
    /// Analyzer over the embedded dictionary.
    pub fn new(config: AnalyzerConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_dictionary(config, PronunciationDictionary::shared())
    }
}

impl<'d> Analyzer<'d> {
    /// Rejects configurations that would produce unusable output, such as an
    /// empty palette.
    pub fn with_dictionary(
        config: AnalyzerConfig,
        dictionary: &'d PronunciationDictionary,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let stopwords = config.stopwords.iter().filter_map(|w| normalize_word(w)).collect();
        Ok(Self {
            config,
            dictionary,
            stopwords,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Whether a token may carry a rhyme at all.
    fn is_rhyme_candidate(&self, token: &WordToken) -> bool {
        let Some(key) = normalize_word(&token.word) else {
            return false;
        };
        let letters = key.chars().filter(char::is_ascii_alphabetic).count();
        letters >= self.config.min_word_len && !self.stopwords.contains(&key)
    }

    /// Tokenize, transcribe and syllabify into a fresh arena.
    fn build_song(&self, lyrics: &str) -> Result<Song> {
        let lines = tokenize(lyrics)?;
        let mut transcriber = Transcriber::new(self.dictionary);
        let mut song = Song::default();

        for line in &lines {
            let first = song.words.len();
            for token in &line.words {
                let id = song.words.len();
                let transcription =
                    (token.has_word() && !line.section_header).then(|| transcriber.transcribe(&token.word));

                let start = song.syllables.len();
                if let Some(t) = &transcription {
                    song.syllables.extend(syllabify(t.form(), id));
                }
                song.word_syllables.push(start..song.syllables.len());

                let bearing =
                    transcription.is_some() && start < song.syllables.len() && self.is_rhyme_candidate(token);
                song.rhyme_bearing.push(bearing);
                song.transcriptions.push(transcription);
                song.words.push(token.clone());
            }
            song.line_words.push(first..song.words.len());
        }
        song.lines = lines;

        debug!(
            lines = song.lines.len(),
            words = song.words.len(),
            distinct = transcriber.distinct_words(),
            syllables = song.syllables.len(),
            "Transcribed lyrics"
        );
        Ok(song)
    }

    /// Analyze one lyric submission.
    ///
    /// Fails only with [`crate::error::AnalyzeError::MalformedInput`]; words that
    /// cannot be transcribed pass through unstyled.
    pub fn analyze(&self, lyrics: &str) -> Result<AnalysisResult> {
        let mut song = self.build_song(lyrics)?;
        let mut clusters = cluster_song(&mut song, self.config.tolerance, self.config.scope);
        assign_colors(&mut clusters, &self.config.palette);
        let scheme = assign_scheme(&song, &mut clusters, &self.config.placeholder);
        Ok(compose(&song, &clusters, scheme))
    }
}

/// Analyze lyrics with the default configuration and embedded dictionary.
pub fn analyze(lyrics: &str) -> Result<AnalysisResult> {
    Analyzer::new(AnalyzerConfig::default())?.analyze(lyrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyllableScope;

    const LEXICON: &str = "CAT  K AE1 T
HAT  HH AE1 T
DOG  D AO1 G
THE  DH AH0
NIGHT  N AY1 T
LIGHT  L AY1 T
TONIGHT  T AH0 N AY1 T
DELIGHT  D IH0 L AY1 T
";

    fn analyzer(config: AnalyzerConfig, dict: &PronunciationDictionary) -> Analyzer<'_> {
        Analyzer::with_dictionary(config, dict).unwrap()
    }

    #[test]
    fn test_stopwords_do_not_rhyme() {
        let dict = PronunciationDictionary::from_lexicon(LEXICON).unwrap();
        let a = analyzer(AnalyzerConfig::default(), &dict);
        let song = a.build_song("the cat\nthe hat").unwrap();
        assert!(!song.rhyme_bearing[0]);
        assert!(song.rhyme_bearing[1]);
    }

    #[test]
    fn test_section_header_not_transcribed() {
        let dict = PronunciationDictionary::from_lexicon(LEXICON).unwrap();
        let a = analyzer(AnalyzerConfig::default(), &dict);
        let song = a.build_song("[Chorus]\ncat").unwrap();
        assert!(song.transcriptions[0].is_none());
        assert!(!song.rhyme_bearing[0]);
        assert!(song.rhyme_bearing[1]);
    }

    #[test]
    fn test_word_syllable_ranges_cover_arena() {
        let dict = PronunciationDictionary::from_lexicon(LEXICON).unwrap();
        let a = analyzer(AnalyzerConfig::default(), &dict);
        let song = a.build_song("tonight, delight!\n\n-- cat").unwrap();
        assert_eq!(song.line_words, vec![0..2, 2..2, 2..4]);
        assert_eq!(song.word_syllables[0], 0..2);
        assert_eq!(song.word_syllables[1], 2..4);
        // "--" has no word
        assert_eq!(song.word_syllables[2], 4..4);
        assert_eq!(song.syllables.len(), 5);
    }

    #[test]
    fn test_scope_all_clusters_inner_syllables() {
        let dict = PronunciationDictionary::from_lexicon(LEXICON).unwrap();
        let config = AnalyzerConfig {
            scope: SyllableScope::All,
            ..AnalyzerConfig::default()
        };
        let result = analyzer(config, &dict).analyze("tonight\ndelight").unwrap();
        assert_eq!(result.scheme, vec!["A", "A"]);
        // Only the final syllables rhyme; "to" and "de" stay plain
        assert!(result.lines[0][0].syllables[0].color.is_none());
        assert!(result.lines[0][0].syllables[1].color.is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dict = PronunciationDictionary::from_lexicon(LEXICON).unwrap();
        let config = AnalyzerConfig {
            palette: Vec::new(),
            ..AnalyzerConfig::default()
        };
        let err = Analyzer::with_dictionary(config, &dict).err().unwrap();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = AnalyzerConfig {
            placeholder: "X".to_string(),
            ..AnalyzerConfig::default()
        };
        assert!(Analyzer::new(config).is_err());
    }

    #[test]
    fn test_single_line_has_no_letter() {
        let dict = PronunciationDictionary::from_lexicon(LEXICON).unwrap();
        let result = analyzer(AnalyzerConfig::default(), &dict).analyze("cat").unwrap();
        assert_eq!(result.scheme, vec!["-"]);
        assert!(result.clusters.is_empty());
    }
}
