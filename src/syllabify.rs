//! Syllabification by maximal onset.
//!
//! Every vowel phoneme is the nucleus of exactly one syllable. Consonants
//! between two vowels go to the following syllable's onset as long as they
//! form a legal English onset; whatever cannot start a syllable stays in the
//! previous syllable's coda ("win-ter", "ex-tra", "sing-er").

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

use crate::models::{Phoneme, PhoneticForm, RhymeKey, Syllable, WordId};

/// Legal multi-consonant onsets (ARPAbet, space separated).
pub static LEGAL_CLUSTERS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "P R", "P L", "P Y", "B R", "B L", "B Y", "T R", "T W", "D R", "D W", "K R", "K L", "K W", "K Y",
        "G R", "G L", "G W", "F R", "F L", "F Y", "TH R", "TH W", "SH R", "S P", "S T", "S K", "S M",
        "S N", "S L", "S W", "S F", "HH Y", "M Y", "V Y", "N Y", "L Y", "S P R", "S P L", "S P Y",
        "S T R", "S K R", "S K W", "S K Y", "S K L",
    ]
    .into_iter()
    .collect()
});

/// Whether a consonant sequence may begin a syllable.
pub fn is_legal_onset(cluster: &[Phoneme]) -> bool {
    match cluster {
        [] => true,
        [single] => single.symbol != "NG",
        _ => {
            let joined = cluster.iter().map(|p| p.symbol.as_str()).collect::<Vec<_>>().join(" ");
            LEGAL_CLUSTERS.contains(joined.as_str())
        }
    }
}

/// Build the rhyme key for a nucleus and coda: stress stripped, onset ignored.
pub fn rhyme_key(nucleus: &Phoneme, coda: &[Phoneme]) -> RhymeKey {
    RhymeKey {
        nucleus: nucleus.symbol.clone(),
        coda: coda.iter().map(|p| p.symbol.clone()).collect(),
    }
}

/// Split a phonetic form into syllables owned by `word`.
/// Forms without a vowel produce no syllables.
pub fn syllabify(form: &PhoneticForm, word: WordId) -> Vec<Syllable> {
    let phonemes = &form.phonemes;
    let vowels: Vec<usize> = phonemes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_vowel())
        .map(|(i, _)| i)
        .collect();
    if vowels.is_empty() {
        return Vec::new();
    }

    // starts[k] = first phoneme index of syllable k
    let mut starts = vec![0usize; vowels.len()];
    for k in 1..vowels.len() {
        let prev = vowels[k - 1];
        let next = vowels[k];
        starts[k] = (prev + 1..=next)
            .find(|&s| is_legal_onset(&phonemes[s..next]))
            .unwrap_or(next);
    }

    vowels
        .iter()
        .enumerate()
        .map(|(k, &v)| {
            let end = starts.get(k + 1).copied().unwrap_or(phonemes.len());
            let onset = phonemes[starts[k]..v].to_vec();
            let nucleus = phonemes[v].clone();
            let coda = phonemes[v + 1..end].to_vec();
            let key = rhyme_key(&nucleus, &coda);
            Syllable {
                word,
                index: k,
                onset,
                nucleus,
                coda,
                key,
                cluster: None,
            }
        })
        .collect()
}
