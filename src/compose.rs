//! Output composer: annotated lines, scheme labels, and the cluster report.
//!
//! Each word's surface text is cut into one fragment per syllable so styling
//! can be applied per syllable. Fragments always concatenate back to the word.
//! Punctuation-only tokens come through whole as a single unstyled fragment.

use crate::models::{AnalysisResult, AnnotatedWord, ClusterReport, RhymeCluster, Song, SyllablePart, WordId};

fn is_vowel_letter(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u' | 'y') || (c.is_alphabetic() && !c.is_ascii())
}

/// Char ranges of vowel-letter runs. A leading "y" is a consonant ("you").
fn vowel_groups(chars: &[char]) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let vowel = is_vowel_letter(chars[i]) && !(i == 0 && chars[i].eq_ignore_ascii_case(&'y'));
        if !vowel {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && is_vowel_letter(chars[i]) {
            i += 1;
        }
        groups.push((start, i));
    }
    groups
}

/// Char offsets where each syllable after the first starts, or None when the
/// spelling doesn't line up with the syllable count.
fn aligned_boundaries(chars: &[char], count: usize) -> Option<Vec<usize>> {
    let mut groups = vowel_groups(chars);
    // Silent final "e" ("escape")
    if groups.len() > count {
        if let Some(&(start, end)) = groups.last() {
            if end == chars.len() && end - start == 1 && chars[start].eq_ignore_ascii_case(&'e') {
                groups.pop();
            }
        }
    }
    if groups.len() != count {
        return None;
    }
    // Split consonant runs between vowel groups down the middle, extra
    // consonant to the following syllable ("win-ter", "ex-tra", "ba-by")
    Some(
        groups
            .windows(2)
            .map(|pair| {
                let gap_start = pair[0].1;
                let gap = pair[1].0 - gap_start;
                gap_start + gap / 2
            })
            .collect(),
    )
}

fn proportional_boundaries(len: usize, count: usize) -> Vec<usize> {
    (1..count).map(|k| (len * k + count / 2) / count).collect()
}

/// Split a word's text into `count` fragments, one per syllable.
pub fn split_word_by_syllables(word: &str, count: usize) -> Vec<String> {
    if count <= 1 {
        return vec![word.to_string()];
    }
    let chars: Vec<char> = word.chars().collect();
    let boundaries =
        aligned_boundaries(&chars, count).unwrap_or_else(|| proportional_boundaries(chars.len(), count));

    let mut pieces = Vec::with_capacity(count);
    let mut start = 0;
    for end in boundaries.into_iter().chain(std::iter::once(chars.len())) {
        let end = end.clamp(start, chars.len());
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }
    pieces
}

fn annotate_word(song: &Song, clusters: &[RhymeCluster], word: WordId) -> AnnotatedWord {
    let token = &song.words[word];
    let syllables = song.syllables_of(word);

    // Punctuation-only tokens pass through whole as one unstyled unit
    if !token.has_word() {
        let surface = token.surface();
        return AnnotatedWord {
            word: surface.clone(),
            leading: String::new(),
            punctuation: String::new(),
            syllables: vec![SyllablePart {
                text: surface,
                color: None,
                cluster: None,
            }],
        };
    }

    let parts = if syllables.is_empty() {
        vec![SyllablePart {
            text: token.word.clone(),
            color: None,
            cluster: None,
        }]
    } else {
        split_word_by_syllables(&token.word, syllables.len())
            .into_iter()
            .zip(syllables)
            .map(|(text, syllable)| {
                let cluster = syllable
                    .cluster
                    .and_then(|id| crate::cluster::find_cluster(clusters, id))
                    .filter(|c| c.qualifies());
                SyllablePart {
                    text,
                    color: cluster.and_then(|c| c.color.clone()),
                    cluster: cluster.map(|c| c.id),
                }
            })
            .collect()
    };

    AnnotatedWord {
        word: token.word.clone(),
        leading: token.leading.clone(),
        punctuation: token.trailing.clone(),
        syllables: parts,
    }
}

fn report_cluster(song: &Song, cluster: &RhymeCluster) -> ClusterReport {
    let members = cluster
        .members
        .iter()
        .map(|&id| {
            let syllable = &song.syllables[id];
            let token = &song.words[syllable.word];
            format!("{}[{}]@{}", token.word, syllable.index, token.line)
        })
        .collect();
    ClusterReport {
        id: cluster.id,
        key: cluster.representative.to_string(),
        letter: cluster.letter.clone(),
        color: cluster.color.clone().unwrap_or_default(),
        first_line: cluster.first_line,
        members,
    }
}

/// Assemble the final result. `scheme` must hold one label per line.
pub fn compose(song: &Song, clusters: &[RhymeCluster], scheme: Vec<String>) -> AnalysisResult {
    let lines = song
        .line_words
        .iter()
        .map(|range| range.clone().map(|w| annotate_word(song, clusters, w)).collect())
        .collect();
    let clusters = clusters
        .iter()
        .filter(|c| c.qualifies())
        .map(|c| report_cluster(song, c))
        .collect();
    AnalysisResult {
        lines,
        scheme,
        clusters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(word: &str, count: usize) -> Vec<String> {
        split_word_by_syllables(word, count)
    }

    #[test]
    fn test_single_syllable_whole_word() {
        assert_eq!(split("cat", 1), vec!["cat"]);
        assert_eq!(split("cat", 0), vec!["cat"]);
    }

    #[test]
    fn test_aligned_split() {
        assert_eq!(split("winter", 2), vec!["win", "ter"]);
        assert_eq!(split("extra", 2), vec!["ex", "tra"]);
        assert_eq!(split("baby", 2), vec!["ba", "by"]);
        assert_eq!(split("fire", 2), vec!["fi", "re"]);
    }

    #[test]
    fn test_silent_e_dropped() {
        assert_eq!(split("escape", 2), vec!["es", "cape"]);
        // Kept when the count needs it
        assert_eq!(split("maybe", 2), vec!["may", "be"]);
    }

    #[test]
    fn test_leading_y_is_consonant() {
        assert_eq!(split("yellow", 2), vec!["yel", "low"]);
    }

    #[test]
    fn test_proportional_fallback() {
        // Three syllables, one vowel group
        let pieces = split("rhythms", 3);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces.concat(), "rhythms");
    }

    #[test]
    fn test_fragments_rebuild_word() {
        for (word, count) in [("beautiful", 3), ("don't", 1), ("runnin'", 2), ("café", 2), ("a", 3)] {
            let pieces = split(word, count);
            assert_eq!(pieces.concat(), word);
            assert_eq!(pieces.len(), count.max(1));
        }
    }
}
