//! Show how words are transcribed, syllabified and keyed for rhyming
//! Usage: cargo run --release --bin pronounce -- <WORD>...

use anyhow::{bail, Result};
use clap::Parser;
use lyric_rhymes::dictionary::PronunciationDictionary;
use lyric_rhymes::models::{Stress, Syllable, Transcription};
use lyric_rhymes::phonetics::Transcriber;
use lyric_rhymes::syllabify::syllabify;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pronounce")]
#[command(about = "Print phonemes, syllables and rhyme keys for words")]
struct Args {
    words: Vec<String>,

    /// CMU-format pronunciation dictionary to use instead of the bundled one
    #[arg(long, env = "LYRIC_RHYMES_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// Also list alternate dictionary pronunciations
    #[arg(long)]
    variants: bool,
}

/// Syllable phonemes with a stress mark: `'` primary, `,` secondary.
fn syllable_text(syllable: &Syllable) -> String {
    let mark = match syllable.stress() {
        Stress::Primary => "'",
        Stress::Secondary => ",",
        Stress::Unstressed => "",
    };
    let phonemes: Vec<String> = syllable.phonemes().map(|p| p.to_string()).collect();
    format!("{mark}{}", phonemes.join(" "))
}

fn describe(word: &str, transcription: &Transcription) -> String {
    let form = transcription.form();
    let syllables = syllabify(form, 0);
    let split: Vec<String> = syllables.iter().map(syllable_text).collect();
    let keys: Vec<String> = syllables.iter().map(|s| s.key.to_string()).collect();
    format!(
        "{:<16} {:<10} {:<28} {:<3} {:<32} {}",
        word,
        transcription.source_label(),
        form.to_string(),
        form.vowel_count(),
        split.join(" | "),
        keys.join(" ")
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if args.words.is_empty() {
        bail!("No words given");
    }

    let owned_dictionary;
    let dictionary = match &args.dictionary {
        Some(path) => {
            owned_dictionary = PronunciationDictionary::from_path(path)?;
            &owned_dictionary
        }
        None => PronunciationDictionary::shared(),
    };

    let mut transcriber = Transcriber::new(dictionary);
    println!(
        "{:<16} {:<10} {:<28} {:<3} {:<32} {}",
        "WORD", "SOURCE", "PHONEMES", "N", "SYLLABLES", "RHYME KEYS"
    );
    let mut known = 0;
    for word in &args.words {
        let transcription = transcriber.transcribe(word);
        if transcription.is_dictionary() {
            known += 1;
        }
        println!("{}", describe(word, &transcription));

        if args.variants {
            let alternates = dictionary.variants(word).unwrap_or_default();
            for (i, form) in alternates.iter().enumerate().skip(1) {
                println!("{:<16} {:<10} {}", format!("  ({})", i + 1), "variant", form);
            }
        }
    }
    eprintln!("{known}/{} words found in dictionary", args.words.len());
    Ok(())
}
