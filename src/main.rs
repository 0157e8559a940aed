use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lyric_rhymes::config::{AnalyzerConfig, CodaFolding, MatchPolicy, SyllableScope};
use lyric_rhymes::dictionary::PronunciationDictionary;
use lyric_rhymes::lrc;
use lyric_rhymes::models::AnalysisResult;
use lyric_rhymes::progress::{create_progress_bar, create_spinner, format_duration, log_progress, set_log_only};
use lyric_rhymes::safety::validate_output_path;
use lyric_rhymes::Analyzer;
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "lyric-rhymes")]
#[command(about = "Find rhymes in song lyrics and label the rhyme scheme")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    analyzer: AnalyzerArgs,
}

#[derive(Args)]
struct AnalyzerArgs {
    /// JSON analyzer config; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CMU-format pronunciation dictionary to use instead of the bundled one
    #[arg(long, global = true, env = "LYRIC_RHYMES_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// Coda folding for near rhymes
    #[arg(long, global = true, value_enum)]
    tolerance: Option<CodaFolding>,

    /// Which syllables of each word take part in clustering
    #[arg(long, global = true, value_enum)]
    scope: Option<SyllableScope>,

    /// Compare near rhymes against cluster representatives only, or all keys
    #[arg(long, global = true, value_enum)]
    policy: Option<MatchPolicy>,

    /// Extra coda phoneme edits allowed between rhyming syllables
    #[arg(long, global = true)]
    max_coda_edits: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one lyrics file (reads stdin when FILE is omitted)
    Analyze {
        file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Treat input as LRC and strip timestamps (implied for .lrc files)
        #[arg(long)]
        lrc: bool,
    },
    /// Analyze every lyrics file under a directory, one JSON file each
    Batch {
        input: PathBuf,

        output: PathBuf,

        #[arg(long, default_value = "0")]
        workers: usize,

        /// Hide progress bars and print periodic progress lines instead
        #[arg(long)]
        log_only: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

const LYRIC_EXTENSIONS: &[&str] = &["txt", "lrc", "lyrics"];
const LOG_INTERVAL: u64 = 100;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &AnalyzerArgs) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::from_path(path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(folding) = args.tolerance {
        config.tolerance.coda_folding = folding;
    }
    if let Some(policy) = args.policy {
        config.tolerance.policy = policy;
    }
    if let Some(edits) = args.max_coda_edits {
        config.tolerance.max_coda_edits = edits;
    }
    if let Some(scope) = args.scope {
        config.scope = scope;
    }
    Ok(config)
}

fn has_lrc_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("lrc"))
}

/// Lyrics text ready for analysis, with LRC tags removed when present.
fn prepare_lyrics(raw: &str, force_lrc: bool) -> String {
    if force_lrc || lrc::is_lrc(raw) {
        let lines = lrc::parse_lines(raw);
        debug!(lines = lines.len(), end = ?lrc::last_time(&lines), "Parsed synced lyrics");
        lrc::lines_text(&lines)
    } else {
        raw.to_string()
    }
}

// ============================================================================
// Text Output
// ============================================================================

fn render_text(result: &AnalysisResult) -> String {
    let width = result.scheme.iter().map(String::len).max().unwrap_or(1).max(1);
    let mut out = String::new();
    for (label, words) in result.scheme.iter().zip(&result.lines) {
        let rendered: Vec<String> = words
            .iter()
            .map(|w| {
                let body: String = w
                    .syllables
                    .iter()
                    .map(|s| match s.cluster {
                        Some(id) => format!("[{}]{}", s.text, id),
                        None => s.text.clone(),
                    })
                    .collect();
                format!("{}{}{}", w.leading, body, w.punctuation)
            })
            .collect();
        out.push_str(&format!("{:<width$} | {}\n", label, rendered.join(" "), width = width));
    }
    if !result.clusters.is_empty() {
        out.push('\n');
        for cluster in &result.clusters {
            out.push_str(&format!(
                "#{:<3} {:<4} {:<10} {}  {}\n",
                cluster.id,
                cluster.letter.as_deref().unwrap_or("-"),
                cluster.key,
                cluster.color,
                cluster.members.join(", ")
            ));
        }
    }
    out
}

// ============================================================================
// Commands
// ============================================================================

fn run_analyze(analyzer: &Analyzer, file: Option<&Path>, format: OutputFormat, force_lrc: bool) -> Result<()> {
    let (raw, is_lrc_file) = match file {
        Some(path) => (
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
            has_lrc_extension(path),
        ),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read lyrics from stdin")?;
            (buf, false)
        }
    };

    let lyrics = prepare_lyrics(&raw, force_lrc || is_lrc_file);
    let result = analyzer.analyze(&lyrics)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print!("{}", render_text(&result)),
    }
    Ok(())
}

fn find_lyric_files(input: &Path) -> Vec<PathBuf> {
    let spinner = create_spinner("Scanning lyrics");
    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let is_lyrics = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| LYRIC_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)));
        if is_lyrics {
            files.push(entry.into_path());
            spinner.inc(1);
        }
    }
    spinner.finish_and_clear();
    files
}

fn output_path_for(input_root: &Path, output_root: &Path, file: &Path) -> PathBuf {
    let relative = file.strip_prefix(input_root).unwrap_or(file);
    output_root.join(relative).with_extension("json")
}

fn analyze_file(analyzer: &Analyzer, input_root: &Path, output_root: &Path, file: &Path) -> Result<()> {
    let output = output_path_for(input_root, output_root, file);
    validate_output_path(&output, input_root, &[file])?;

    let raw = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let lyrics = prepare_lyrics(&raw, has_lrc_extension(file));
    let result = analyzer
        .analyze(&lyrics)
        .with_context(|| format!("Failed to analyze {}", file.display()))?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&result)?;
    std::fs::write(&output, json).with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

fn run_batch(analyzer: &Analyzer, input: &Path, output: &Path, workers: usize) -> Result<()> {
    if !input.is_dir() {
        bail!("Input '{}' is not a directory", input.display());
    }
    if workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()
            .context("Failed to set thread pool size")?;
    }

    let start = Instant::now();
    let files = find_lyric_files(input);
    let total = files.len() as u64;
    info!(files = total, input = %input.display(), "Found lyrics files");

    let pb = create_progress_bar(total, "Analyzing");
    let done = AtomicU64::new(0);
    let failures: Vec<String> = files
        .par_iter()
        .filter_map(|file| {
            let outcome = analyze_file(analyzer, input, output, file);
            pb.inc(1);
            let current = done.fetch_add(1, Ordering::Relaxed) + 1;
            log_progress("analyze", current, total, LOG_INTERVAL);
            outcome.err().map(|e| format!("{}: {:#}", file.display(), e))
        })
        .collect();
    pb.finish_and_clear();

    for failure in &failures {
        warn!("{}", failure);
    }
    info!(
        analyzed = total - failures.len() as u64,
        failed = failures.len(),
        elapsed = %format_duration(start.elapsed()),
        "Batch complete"
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli.analyzer)?;
    let owned_dictionary;
    let dictionary = match &cli.analyzer.dictionary {
        Some(path) => {
            owned_dictionary = PronunciationDictionary::from_path(path)?;
            &owned_dictionary
        }
        None => PronunciationDictionary::shared(),
    };
    let analyzer = Analyzer::with_dictionary(config, dictionary)?;
    let config = analyzer.config();
    info!(
        words = dictionary.len(),
        folding = ?config.tolerance.coda_folding,
        policy = ?config.tolerance.policy,
        max_coda_edits = config.tolerance.max_coda_edits,
        scope = ?config.scope,
        "Analyzer ready"
    );

    match cli.command {
        Command::Analyze { file, format, lrc } => run_analyze(&analyzer, file.as_deref(), format, lrc),
        Command::Batch {
            input,
            output,
            workers,
            log_only,
        } => {
            set_log_only(log_only);
            run_batch(&analyzer, &input, &output, workers)
        }
    }
}
