//! Lyric rhyme analysis library - shared modules for all binaries.

pub mod analyze;
pub mod cluster;
pub mod compose;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod g2p;
pub mod lrc;
pub mod models;
pub mod normalize;
pub mod phonetics;
pub mod progress;
pub mod rhyme;
pub mod safety;
pub mod scheme;
pub mod syllabify;
pub mod tokenize;

pub use analyze::{analyze, Analyzer};
pub use error::AnalyzeError;
