//! Synced lyrics (LRC) input.
//!
//! LRC files prefix lines with `[mm:ss.cc]` tags, may carry several tags per
//! line for repeated lines, enhanced `<mm:ss.cc>` word tags, and metadata
//! lines such as `[ar:Artist]`. Analysis only wants the text, one line per
//! lyric line, blank lines kept.

use once_cell::sync::Lazy;
use regex::Regex;

/// Line time tag: `[01:23.45]`, `[1:23]`, `[01:23:45]`, `[01:23.456]`.
pub static TIME_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d{1,3}):(\d{2})(?:[.:](\d{1,3}))?\]").unwrap());

/// Enhanced LRC word tag: `<01:23.45>`.
pub static WORD_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\d{1,3}:\d{2}(?:[.:]\d{1,3})?>").unwrap());

/// Metadata-only line: `[ar:...]`, `[ti:...]`, `[offset:+200]`, ...
pub static METADATA_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\[(?:ar|ti|al|au|by|offset|length|re|ve|tool|la|id|#)\s*:[^\]]*\]\s*$").unwrap()
});

/// One parsed LRC line.
#[derive(Debug, Clone, PartialEq)]
pub struct LrcLine {
    /// Start time in seconds of the first tag, if any
    pub time: Option<f64>,
    pub text: String,
}

/// Seconds for one `[mm:ss.cc]` tag match.
fn tag_seconds(caps: &regex::Captures) -> Option<f64> {
    let minutes: f64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(2)?.as_str().parse().ok()?;
    let fraction = match caps.get(3) {
        Some(m) => {
            let digits = m.as_str();
            digits.parse::<f64>().ok()? / 10f64.powi(digits.len() as i32)
        }
        None => 0.0,
    };
    Some(minutes * 60.0 + seconds + fraction)
}

/// Whether text looks like LRC: some line starts with a time tag.
pub fn is_lrc(text: &str) -> bool {
    text.lines()
        .any(|line| TIME_TAG.find(line.trim_start()).is_some_and(|m| m.start() == 0))
}

/// Parse LRC text. Metadata lines are dropped; every other line is kept.
pub fn parse_lines(text: &str) -> Vec<LrcLine> {
    text.lines()
        .filter(|line| !METADATA_LINE.is_match(line))
        .map(|line| {
            let time = TIME_TAG.captures(line).and_then(|caps| tag_seconds(&caps));
            let without_tags = TIME_TAG.replace_all(line, "");
            let without_words = WORD_TAG.replace_all(&without_tags, "");
            LrcLine {
                time,
                text: without_words.trim().to_string(),
            }
        })
        .collect()
}

/// Latest line start time, roughly the length of the synced song.
pub fn last_time(lines: &[LrcLine]) -> Option<f64> {
    lines.iter().filter_map(|line| line.time).reduce(f64::max)
}

/// Plain text of parsed lines, one per lyric line.
pub fn lines_text(lines: &[LrcLine]) -> String {
    lines.iter().map(|line| line.text.as_str()).collect::<Vec<_>>().join("\n")
}

/// Plain lyrics text from LRC, one line per lyric line.
pub fn strip_timestamps(text: &str) -> String {
    lines_text(&parse_lines(text))
}
