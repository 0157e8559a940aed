//! Word normalization for pronunciation lookup.
//!
//! Lookup keys are lowercase ASCII with internal apostrophes kept, so
//! "Beyoncé", "DON’T" and "don't" resolve to the same dictionary entries as
//! their plain spellings. The surface text of a token is never modified;
//! these functions only build keys.

use any_ascii::any_ascii;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Section markers such as "[Chorus]", "(Verse 2)" or "[Bridge: Artist]".
pub static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*[\(\[]\s*(?:intro|outro|verse|chorus|pre-?chorus|post-?chorus|hook|bridge|refrain|interlude|breakdown|instrumental|repeat)\b[^\)\]]*[\)\]]\s*$").unwrap()
});

/// Lyric g-dropping: "runnin", "nothin", "somethin".
/// Requires two letters before "in" so "in" and "win" are untouched.
pub static G_DROPPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z']*[a-z]{2})in$").unwrap());

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Check if a character is a Unicode combining mark (diacritical mark).
pub fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F)
}

/// Fold Unicode text to ASCII by applying NFKD decomposition and removing combining marks.
/// e.g., "Beyoncé" → "beyonce", "naïve" → "naive"
pub fn fold_to_ascii(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    any_ascii(&stripped).to_lowercase()
}

/// Convert curly and accent-style apostrophes to a straight apostrophe.
pub fn normalize_apostrophes(s: &str) -> String {
    s.replace(['\u{2018}', '\u{2019}', '\u{02BC}'], "'")
        .replace(['\u{00B4}', '\u{0060}'], "'")
}

// ============================================================================
// NORMALIZATION FUNCTIONS
// ============================================================================

/// Build the dictionary key for a word: ASCII, lowercase, letters and
/// internal apostrophes only. Returns None if nothing alphabetic remains.
pub fn normalize_word(word: &str) -> Option<String> {
    let folded = fold_to_ascii(&normalize_apostrophes(word));
    let key: String = folded
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == '\'')
        .collect();
    let key = key.trim_matches('\'');
    if key.chars().any(|c| c.is_ascii_lowercase()) {
        Some(key.to_string())
    } else {
        None
    }
}

/// Restore a dropped "g": "runnin" → "running". None if the word doesn't end in "in".
pub fn restore_dropped_g(key: &str) -> Option<String> {
    G_DROPPED
        .captures(key)
        .and_then(|caps| caps.get(1))
        .map(|stem| format!("{}ing", stem.as_str()))
}

/// True for a line that only labels a song section, e.g. "[Chorus]".
pub fn is_section_header(line: &str) -> bool {
    SECTION_HEADER.is_match(line)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_to_ascii() {
        assert_eq!(fold_to_ascii("Björk"), "bjork");
        assert_eq!(fold_to_ascii("Beyoncé"), "beyonce");
        assert_eq!(fold_to_ascii("NAÏVE"), "naive");
    }

    #[test]
    fn test_normalize_word_basic() {
        assert_eq!(normalize_word("Hello"), Some("hello".to_string()));
        assert_eq!(normalize_word("DON’T"), Some("don't".to_string()));
        assert_eq!(normalize_word("café"), Some("cafe".to_string()));
    }

    #[test]
    fn test_normalize_word_strips_outer_apostrophes() {
        assert_eq!(normalize_word("'cause"), Some("cause".to_string()));
        assert_eq!(normalize_word("runnin'"), Some("runnin".to_string()));
    }

    #[test]
    fn test_normalize_word_rejects_non_alphabetic() {
        assert_eq!(normalize_word("1999"), None);
        assert_eq!(normalize_word("'"), None);
        assert_eq!(normalize_word(""), None);
    }

    #[test]
    fn test_restore_dropped_g() {
        assert_eq!(restore_dropped_g("runnin"), Some("running".to_string()));
        assert_eq!(restore_dropped_g("nothin"), Some("nothing".to_string()));
        // Too short to be a dropped g
        assert_eq!(restore_dropped_g("in"), None);
        assert_eq!(restore_dropped_g("win"), None);
        assert_eq!(restore_dropped_g("dance"), None);
    }

    #[test]
    fn test_section_header() {
        assert!(is_section_header("[Chorus]"));
        assert!(is_section_header("  (Verse 2)"));
        assert!(is_section_header("[Bridge: Someone]"));
        assert!(!is_section_header("[I walked alone]"));
        assert!(!is_section_header("Chorus of birds"));
    }
}
