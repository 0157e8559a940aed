//! Spelling-based grapheme-to-phoneme fallback.
//!
//! Used only for words missing from the dictionary (slang, names, typos).
//! The rules are approximate English spelling patterns: consonant and vowel
//! clusters map to single phonemes, a silent final "e" lengthens the vowel
//! before it, and the first vowel carries primary stress. The output is
//! deterministic and never fails; a word without letters yields an empty form.

use crate::models::{is_vowel_symbol, Phoneme, PhoneticForm, Stress};

fn is_vowel_letter(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_vowel_like(c: char) -> bool {
    is_vowel_letter(c) || c == 'y'
}

fn matches_at(letters: &[char], i: usize, end: usize, pattern: &str) -> bool {
    let len = pattern.chars().count();
    i + len <= end && pattern.chars().zip(&letters[i..i + len]).all(|(p, l)| p == *l)
}

/// Transcribe a normalized (lowercase ASCII) word from its spelling.
pub fn spell_to_phonemes(key: &str) -> PhoneticForm {
    let letters: Vec<char> = key.chars().filter(|c| c.is_ascii_lowercase()).collect();
    let n = letters.len();
    if n == 0 {
        return PhoneticForm::default();
    }

    // Consonant + "le" ending is a syllable of its own ("little", "bubble")
    let consonant_le = n > 3 && letters[n - 1] == 'e' && letters[n - 2] == 'l' && !is_vowel_like(letters[n - 3]);
    let silent_e = !consonant_le
        && n > 2
        && letters[n - 1] == 'e'
        && !is_vowel_like(letters[n - 2])
        && letters[..n - 2].iter().any(|c| is_vowel_like(*c));
    let end = if silent_e {
        n - 1
    } else if consonant_le {
        n - 2
    } else {
        n
    };
    let long_at = (silent_e && end >= 2 && is_vowel_letter(letters[end - 2])
        && (end < 3 || !is_vowel_like(letters[end - 3])))
        .then(|| end - 2);

    let mut symbols: Vec<&'static str> = Vec::new();
    let mut i = 0;
    while i < end {
        let (consumed, phones) = rule_at(&letters, i, end, long_at);
        symbols.extend(phones);
        i += consumed.max(1);
    }
    if consonant_le {
        symbols.extend(["AH", "L"]);
    }

    let mut seen_vowel = false;
    let phonemes = symbols
        .into_iter()
        .map(|symbol| {
            if is_vowel_symbol(symbol) {
                let stress = if seen_vowel { Stress::Unstressed } else { Stress::Primary };
                seen_vowel = true;
                Phoneme::vowel(symbol, stress)
            } else {
                Phoneme::consonant(symbol)
            }
        })
        .collect();
    PhoneticForm::new(phonemes)
}

/// Match the longest spelling rule at position `i`, returning the number of
/// letters consumed and the phonemes produced.
fn rule_at(letters: &[char], i: usize, end: usize, long_at: Option<usize>) -> (usize, Vec<&'static str>) {
    let at = |pattern: &str| matches_at(letters, i, end, pattern);
    let next = letters.get(i + 1).copied().filter(|_| i + 1 < end);
    let followed_by_vowel = |len: usize| i + len < end && is_vowel_like(letters[i + len]);
    let c = letters[i];

    // Silent initial consonants
    if i == 0 {
        for (pattern, phones) in [("kn", "N"), ("wr", "R"), ("gn", "N"), ("ps", "S")] {
            if at(pattern) {
                return (2, vec![phones]);
            }
        }
    }

    // Long clusters
    for (pattern, phones) in [
        ("eigh", &["EY"][..]),
        ("augh", &["AO"][..]),
        ("ough", &["AO"][..]),
        ("tch", &["CH"][..]),
        ("igh", &["AY"][..]),
    ] {
        if at(pattern) {
            return (pattern.len(), phones.to_vec());
        }
    }

    // Consonant digraphs
    for (pattern, phones) in [
        ("ch", &["CH"][..]),
        ("sh", &["SH"][..]),
        ("th", &["TH"][..]),
        ("ph", &["F"][..]),
        ("wh", &["W"][..]),
        ("ck", &["K"][..]),
        ("ng", &["NG"][..]),
        ("qu", &["K", "W"][..]),
        ("dg", &["JH"][..]),
        ("gh", &[][..]),
    ] {
        if at(pattern) {
            return (2, phones.to_vec());
        }
    }

    // R-colored vowels before a consonant or the end of the word
    if !followed_by_vowel(2) {
        for (pattern, phones) in [
            ("ar", &["AA", "R"][..]),
            ("or", &["AO", "R"][..]),
            ("er", &["ER"][..]),
            ("ir", &["ER"][..]),
            ("ur", &["ER"][..]),
        ] {
            if at(pattern) {
                return (2, phones.to_vec());
            }
        }
    }

    // Vowel digraphs
    let digraph_at_end = i + 2 == end;
    for (pattern, phones) in [
        ("ee", "IY"),
        ("ea", "IY"),
        ("ai", "EY"),
        ("ay", "EY"),
        ("oa", "OW"),
        ("oo", "UW"),
        ("ou", "AW"),
        ("ow", "OW"),
        ("oi", "OY"),
        ("oy", "OY"),
        ("au", "AO"),
        ("aw", "AO"),
        ("ei", "EY"),
        ("ey", if digraph_at_end { "IY" } else { "EY" }),
        ("ie", "IY"),
        ("ue", "UW"),
        ("ew", "UW"),
        ("ui", "UW"),
    ] {
        if at(pattern) {
            return (2, vec![phones]);
        }
    }

    let at_end = i + 1 == end;
    if is_vowel_letter(c) {
        let long = long_at == Some(i);
        let phone = match (c, long, at_end) {
            ('a', true, _) => "EY",
            ('e', true, _) => "IY",
            ('i', true, _) => "AY",
            ('o', true, _) => "OW",
            ('u', true, _) => "UW",
            ('a', false, true) => "AH",
            ('e', false, true) => "IY",
            ('i', false, true) => "IY",
            ('o', false, true) => "OW",
            ('u', false, true) => "UW",
            ('a', ..) => "AE",
            ('e', ..) => "EH",
            ('i', ..) => "IH",
            ('o', ..) => "AA",
            _ => "AH",
        };
        return (1, vec![phone]);
    }

    if c == 'y' {
        if i == 0 && followed_by_vowel(1) {
            return (1, vec!["Y"]);
        }
        if at_end {
            let only_vowel = !letters[..i].iter().any(|l| is_vowel_letter(*l));
            return (1, vec![if only_vowel { "AY" } else { "IY" }]);
        }
        if followed_by_vowel(1) {
            return (1, vec!["Y"]);
        }
        return (1, vec!["IH"]);
    }

    // Doubled consonants sound once
    let consumed = if next == Some(c) { 2 } else { 1 };
    let soft = matches!(letters.get(i + consumed), Some('e' | 'i' | 'y'));
    let phones: Vec<&'static str> = match c {
        'b' => vec!["B"],
        'c' if soft => vec!["S"],
        'c' => vec!["K"],
        'd' => vec!["D"],
        'f' => vec!["F"],
        'g' if soft && i > 0 && consumed == 1 => vec!["JH"],
        'g' => vec!["G"],
        // "h" after a vowel is silent ("oh", "yeah")
        'h' if i > 0 && is_vowel_like(letters[i - 1]) => vec![],
        'h' => vec!["HH"],
        'j' => vec!["JH"],
        'k' | 'q' => vec!["K"],
        'l' => vec!["L"],
        'm' => vec!["M"],
        'n' => vec!["N"],
        'p' => vec!["P"],
        'r' => vec!["R"],
        // Final "s" after a voiced sound
        's' if i + consumed == end && i > 0 && !matches!(letters[i - 1], 'p' | 't' | 'k' | 'f' | 'c' | 's') => {
            vec!["Z"]
        }
        's' => vec!["S"],
        't' => vec!["T"],
        'v' => vec!["V"],
        'w' => vec!["W"],
        'x' => vec!["K", "S"],
        'z' => vec!["Z"],
        _ => vec![],
    };
    (consumed, phones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(word: &str) -> String {
        spell_to_phonemes(word).to_string()
    }

    #[test]
    fn test_simple_cvc() {
        assert_eq!(spell("cat"), "K AE1 T");
        assert_eq!(spell("dog"), "D AA1 G");
        assert_eq!(spell("bling"), "B L IH1 NG");
    }

    #[test]
    fn test_silent_e_lengthens_vowel() {
        assert_eq!(spell("hate"), "HH EY1 T");
        assert_eq!(spell("vibe"), "V AY1 B");
        assert_eq!(spell("zone"), "Z OW1 N");
    }

    #[test]
    fn test_digraphs() {
        assert_eq!(spell("sheet"), "SH IY1 T");
        assert_eq!(spell("night"), "N AY1 T");
        assert_eq!(spell("phone"), "F OW1 N");
        assert_eq!(spell("knack"), "N AE1 K");
    }

    #[test]
    fn test_final_y() {
        assert_eq!(spell("fly"), "F L AY1");
        assert_eq!(spell("swaggy"), "S W AE1 G IY0");
    }

    #[test]
    fn test_consonant_le() {
        assert_eq!(spell("bubble"), "B AH1 B AH0 L");
    }

    #[test]
    fn test_r_colored() {
        assert_eq!(spell("blurt"), "B L ER1 T");
        assert_eq!(spell("starz"), "S T AA1 R Z");
    }

    #[test]
    fn test_only_first_vowel_stressed() {
        let form = spell_to_phonemes("skrrtadoodle");
        let primaries = form
            .phonemes
            .iter()
            .filter(|p| p.stress == Some(Stress::Primary))
            .count();
        assert_eq!(primaries, 1);
    }

    #[test]
    fn test_no_vowels_no_syllable_nucleus() {
        let form = spell_to_phonemes("hmm");
        assert!(!form.is_empty());
        assert_eq!(form.vowel_count(), 0);
    }

    #[test]
    fn test_empty_key() {
        assert!(spell_to_phonemes("").is_empty());
        assert!(spell_to_phonemes("'").is_empty());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(spell("flexin"), spell("flexin"));
    }
}
