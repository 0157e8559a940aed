//! Scheme letters and cluster colors.
//!
//! Colors go to every cluster with two or more members, in creation order,
//! cycling through the palette. Letters go only to clusters that end a line,
//! in the order those lines appear. Nothing here depends on hashing order, so
//! the same song always gets the same letters and colors.

use tracing::debug;

use crate::models::{RhymeCluster, Song, WordId};

/// Label for the n-th scheme cluster: A..Z, then AA, BB, .. ZZ, then AAA, ...
pub fn scheme_letter(n: usize) -> String {
    let letter = char::from(b'A' + (n % 26) as u8);
    letter.to_string().repeat(n / 26 + 1)
}

/// Give each qualifying cluster a palette color in creation order.
/// `clusters` must be sorted by id.
pub fn assign_colors(clusters: &mut [RhymeCluster], palette: &[String]) {
    if palette.is_empty() {
        return;
    }
    for (slot, cluster) in clusters.iter_mut().filter(|c| c.qualifies()).enumerate() {
        cluster.color = Some(palette[slot % palette.len()].clone());
    }
}

/// Last token of a line that has a word, skipping punctuation-only tokens.
pub fn line_ending_word(song: &Song, line: usize) -> Option<WordId> {
    song.line_words[line].clone().rev().find(|&w| song.words[w].has_word())
}

/// Index into `clusters` of the cluster governing the end of a line, if the
/// last word rhymes with anything.
fn line_ending_cluster(song: &Song, clusters: &[RhymeCluster], line: usize) -> Option<usize> {
    let word = line_ending_word(song, line)?;
    if !song.rhyme_bearing[word] {
        return None;
    }
    let id = song.syllables_of(word).last()?.cluster?;
    let index = clusters.binary_search_by_key(&id, |c| c.id).ok()?;
    clusters[index].qualifies().then_some(index)
}

/// Letter every line-ending cluster in line order and return one label per
/// line. Blank lines get an empty label, lines without a rhyme the placeholder.
pub fn assign_scheme(song: &Song, clusters: &mut [RhymeCluster], placeholder: &str) -> Vec<String> {
    let mut next_letter = 0;
    let mut scheme = Vec::with_capacity(song.lines.len());
    for line in &song.lines {
        if line.is_blank() {
            scheme.push(String::new());
            continue;
        }
        let Some(index) = line_ending_cluster(song, clusters, line.index) else {
            scheme.push(placeholder.to_string());
            continue;
        };
        let cluster = &mut clusters[index];
        let letter = cluster.letter.get_or_insert_with(|| {
            let letter = scheme_letter(next_letter);
            next_letter += 1;
            letter
        });
        scheme.push(letter.clone());
    }
    debug!(letters = next_letter, lines = scheme.len(), "Assigned rhyme scheme");
    scheme
}
