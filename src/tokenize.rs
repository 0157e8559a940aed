//! Lyric tokenizer: raw text to lines of word tokens.
//!
//! Lines are kept one-to-one with the input, blank lines included, so line
//! indices stay stable through every later stage. Each whitespace-delimited
//! token is split into leading punctuation, word, and trailing punctuation;
//! concatenating the three always gives back the original token.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AnalyzeError, Result};
use crate::models::{LyricLine, WordToken};
use crate::normalize::is_section_header;

static LEADING_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\p{Alphabetic}\p{N}]+").unwrap());
static TRAILING_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+$").unwrap());

/// Reject input that cannot produce an analysis.
pub fn validate(lyrics: &str) -> Result<()> {
    if lyrics.trim().is_empty() {
        return Err(AnalyzeError::MalformedInput {
            reason: "lyrics are empty",
        });
    }
    if !lyrics.chars().any(char::is_alphabetic) {
        return Err(AnalyzeError::MalformedInput {
            reason: "lyrics contain no alphabetic characters",
        });
    }
    Ok(())
}

/// Split lyrics into lines of tokens. Fails only on empty or non-alphabetic input.
/// A trailing newline ends in one more (blank) line.
pub fn tokenize(lyrics: &str) -> Result<Vec<LyricLine>> {
    validate(lyrics)?;
    Ok(lyrics
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(index, line)| tokenize_line(index, line))
        .collect())
}

/// Tokenize a single line. Never fails; a blank line yields no words.
pub fn tokenize_line(index: usize, line: &str) -> LyricLine {
    let words = line
        .split_whitespace()
        .enumerate()
        .map(|(position, raw)| split_token(raw, index, position))
        .collect();
    LyricLine {
        index,
        words,
        section_header: is_section_header(line),
    }
}

/// Separate a raw token into (leading, word, trailing).
/// A token with no alphanumeric character is all leading punctuation.
pub fn split_token(raw: &str, line: usize, position: usize) -> WordToken {
    let start = LEADING_PUNCT.find(raw).map_or(0, |m| m.end());
    let (leading, word, trailing) = if start == raw.len() {
        (raw, "", "")
    } else {
        let end = TRAILING_PUNCT.find(&raw[start..]).map_or(raw.len(), |m| start + m.start());
        (&raw[..start], &raw[start..end], &raw[end..])
    };

    WordToken {
        word: word.to_string(),
        leading: leading.to_string(),
        trailing: trailing.to_string(),
        line,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_token_punctuation() {
        let t = split_token("\"Hello,", 0, 0);
        assert_eq!(t.leading, "\"");
        assert_eq!(t.word, "Hello");
        assert_eq!(t.trailing, ",");
    }

    #[test]
    fn test_split_token_keeps_internal_apostrophe() {
        let t = split_token("don't!", 0, 0);
        assert_eq!(t.word, "don't");
        assert_eq!(t.trailing, "!");
    }

    #[test]
    fn test_split_token_punctuation_only() {
        let t = split_token("--", 2, 3);
        assert!(!t.has_word());
        assert_eq!(t.leading, "--");
        assert_eq!(t.surface(), "--");
    }

    #[test]
    fn test_split_token_digits_count_as_word() {
        let t = split_token("(24/7)", 0, 0);
        assert_eq!(t.leading, "(");
        assert_eq!(t.word, "24/7");
        assert_eq!(t.trailing, ")");

        let t = split_token("...!?", 0, 0);
        assert_eq!(t.leading, "...!?");
        assert_eq!(t.trailing, "");
    }

    #[test]
    fn test_split_token_unicode() {
        let t = split_token("«café»", 0, 0);
        assert_eq!(t.word, "café");
        assert_eq!(t.leading, "«");
        assert_eq!(t.trailing, "»");
    }

    #[test]
    fn test_tokenize_preserves_blank_lines() {
        let lines = tokenize("one\n\nthree").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_blank());
        assert_eq!(lines[2].index, 2);
        assert_eq!(lines[2].words[0].line, 2);
    }

    #[test]
    fn test_tokenize_positions() {
        let lines = tokenize("  the   cat sat ").unwrap();
        let words: Vec<&str> = lines[0].words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["the", "cat", "sat"]);
        assert_eq!(lines[0].words[2].position, 2);
    }

    #[test]
    fn test_tokenize_crlf() {
        let lines = tokenize("cat\r\nhat").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].words[0].word, "cat");
        assert_eq!(lines[0].words[0].trailing, "");
    }

    #[test]
    fn test_tokenize_trailing_newline_keeps_blank_line() {
        let lines = tokenize("cat\nhat\n").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].is_blank());

        let lines = tokenize("cat\r\nhat\r\n").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].words[0].trailing, "");
        assert!(lines[2].is_blank());
    }

    #[test]
    fn test_tokenize_rejects_empty() {
        assert!(matches!(
            tokenize(""),
            Err(AnalyzeError::MalformedInput { .. })
        ));
        assert!(tokenize("   \n\t").is_err());
    }

    #[test]
    fn test_tokenize_rejects_non_alphabetic() {
        assert!(tokenize("123 456\n!!!").is_err());
    }

    #[test]
    fn test_section_header_flagged() {
        let lines = tokenize("[Chorus]\nla la").unwrap();
        assert!(lines[0].section_header);
        assert!(!lines[1].section_header);
    }
}
