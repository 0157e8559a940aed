//! Rhyme key folding and near-rhyme comparison.
//!
//! Two syllables rhyme when their nuclei are the same vowel and their codas
//! are equal after folding, or within the configured number of phoneme edits.
//! Folding maps coda consonants onto a representative so that hashing the
//! folded key finds every exact-or-folded match in one lookup.

use crate::config::{CodaFolding, Tolerance};
use crate::models::RhymeKey;

/// Representative for a coda consonant under the given folding.
pub fn fold_consonant(symbol: &str, folding: CodaFolding) -> &str {
    match folding {
        CodaFolding::Exact => symbol,
        CodaFolding::Voicing => match symbol {
            "B" => "P",
            "D" => "T",
            "G" => "K",
            "V" => "F",
            "DH" => "TH",
            "Z" => "S",
            "ZH" => "SH",
            "JH" => "CH",
            other => other,
        },
        CodaFolding::Manner => match symbol {
            "M" | "N" | "NG" => "N",
            "S" | "Z" | "SH" | "ZH" | "CH" | "JH" => "S",
            "P" | "B" | "T" | "D" | "K" | "G" => "P",
            "F" | "V" => "F",
            "L" | "R" => "L",
            other => other,
        },
    }
}

/// Fold every coda consonant of a key. The nucleus is kept as is.
pub fn canonical_key(key: &RhymeKey, folding: CodaFolding) -> RhymeKey {
    RhymeKey {
        nucleus: key.nucleus.clone(),
        coda: key
            .coda
            .iter()
            .map(|symbol| fold_consonant(symbol, folding).to_string())
            .collect(),
    }
}

/// Phoneme-level edit distance between two codas.
pub fn coda_distance(a: &RhymeKey, b: &RhymeKey) -> usize {
    strsim::generic_levenshtein(&a.coda, &b.coda)
}

/// Compare two already-folded keys under the tolerance's edit allowance.
pub fn folded_keys_rhyme(a: &RhymeKey, b: &RhymeKey, tolerance: &Tolerance) -> bool {
    if a.nucleus != b.nucleus {
        return false;
    }
    a.coda == b.coda || (tolerance.max_coda_edits > 0 && coda_distance(a, b) <= tolerance.max_coda_edits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchPolicy;

    fn key(nucleus: &str, coda: &[&str]) -> RhymeKey {
        RhymeKey {
            nucleus: nucleus.to_string(),
            coda: coda.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn keys_rhyme(a: &RhymeKey, b: &RhymeKey, tolerance: &Tolerance) -> bool {
        folded_keys_rhyme(
            &canonical_key(a, tolerance.coda_folding),
            &canonical_key(b, tolerance.coda_folding),
            tolerance,
        )
    }

    fn tolerance(coda_folding: CodaFolding, max_coda_edits: usize) -> Tolerance {
        Tolerance {
            coda_folding,
            max_coda_edits,
            policy: MatchPolicy::Representative,
        }
    }

    #[test]
    fn test_exact_match() {
        let t = Tolerance::exact();
        assert!(keys_rhyme(&key("AE", &["T"]), &key("AE", &["T"]), &t));
        assert!(!keys_rhyme(&key("AE", &["T"]), &key("AE", &["D"]), &t));
    }

    #[test]
    fn test_nucleus_must_match() {
        let t = tolerance(CodaFolding::Manner, 2);
        assert!(!keys_rhyme(&key("AE", &["T"]), &key("AA", &["T"]), &t));
    }

    #[test]
    fn test_voicing_folds_pairs() {
        let t = tolerance(CodaFolding::Voicing, 0);
        assert!(keys_rhyme(&key("AE", &["T"]), &key("AE", &["D"]), &t));
        assert!(keys_rhyme(&key("IY", &["Z"]), &key("IY", &["S"]), &t));
        assert!(!keys_rhyme(&key("IY", &["M"]), &key("IY", &["N"]), &t));
    }

    #[test]
    fn test_manner_slant_rhyme() {
        // "dream" / "green"
        let t = tolerance(CodaFolding::Manner, 0);
        assert!(keys_rhyme(&key("IY", &["M"]), &key("IY", &["N"]), &t));
        assert!(keys_rhyme(&key("AE", &["K"]), &key("AE", &["T"]), &t));
        assert!(!keys_rhyme(&key("AE", &["K"]), &key("AE", &["N"]), &t));
    }

    #[test]
    fn test_coda_edits() {
        // "heart" / "car"
        let strict = tolerance(CodaFolding::Exact, 0);
        let loose = tolerance(CodaFolding::Exact, 1);
        let heart = key("AA", &["R", "T"]);
        let car = key("AA", &["R"]);
        assert!(!keys_rhyme(&heart, &car, &strict));
        assert!(keys_rhyme(&heart, &car, &loose));
        assert_eq!(coda_distance(&heart, &car), 1);
    }

    #[test]
    fn test_canonical_key_keeps_nucleus() {
        let folded = canonical_key(&key("OW", &["L", "D"]), CodaFolding::Voicing);
        assert_eq!(folded.to_string(), "OW-LT");
    }
}
