use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use warcsplit::{
    fetch, open_input, Compression, OutputRouter, ParserConfig, PipelineConfig, RouterConfig,
    StreamPipeline,
};

#[derive(Parser)]
#[command(name = "warcsplit")]
#[command(about = "Split gzipped WARC/WET record streams into per-language JSON Lines files")]
#[command(version)]
struct Args {
    /// Local input file (`-` for stdin)
    #[arg(value_name = "INPUT", required_unless_present = "url", conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Download the input from URL before processing
    #[arg(long)]
    url: Option<String>,

    /// Config file with `reserved_words` and `record_start` (JSON or YAML)
    #[arg(short = 'c', long, default_value = "config/config.json")]
    config: PathBuf,

    /// Directory for downloaded input
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Output root (default: <DATA_DIR>/output)
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Remove the existing output root before processing
    #[arg(long)]
    clean: bool,

    /// Keep the downloaded input after processing
    #[arg(long)]
    keep_download: bool,

    /// Input compression
    #[arg(long, value_enum, default_value = "auto")]
    compression: Compression,

    /// Name of the file written in each language directory
    #[arg(long, default_value = warcsplit::pipeline::config::DEFAULT_FILE_NAME)]
    file_name: String,

    /// Field holding the comma-separated language list
    #[arg(long, default_value = warcsplit::pipeline::config::DEFAULT_LANGUAGE_FIELD)]
    language_field: String,

    /// Routing key for records without a language
    #[arg(long, default_value = warcsplit::pipeline::config::DEFAULT_LANGUAGE)]
    default_language: String,

    /// Do not write records that carry no fields and no body
    #[arg(long)]
    skip_empty: bool,

    /// Buffer size for I/O
    #[arg(long, default_value = "65536")] // 64KB
    buffer_size: NonZeroUsize,

    /// Log progress every N records
    #[arg(long, value_name = "N")]
    progress: Option<usize>,

    /// Debug mode - verbose logging
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let parser_config = ParserConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config '{}'", args.config.display()))?;
    tracing::debug!(?parser_config, "loaded config");

    let output_root = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.data_dir.join("output"));

    let (input_path, downloaded) = match (&args.input, &args.url) {
        (Some(path), _) => (path.clone(), false),
        (None, Some(url)) => {
            let path = fetch::download(url, &args.data_dir)
                .with_context(|| format!("Failed to download '{}'", url))?;
            (path, true)
        }
        (None, None) => anyhow::bail!("Must provide either INPUT or --url"),
    };

    let result = process(&args, &parser_config, &input_path, &output_root);

    if downloaded && !args.keep_download {
        if let Err(e) = std::fs::remove_file(&input_path) {
            tracing::warn!(path = %input_path.display(), error = %e, "failed to remove download");
        }
    }

    result
}

fn process(
    args: &Args,
    parser_config: &ParserConfig,
    input_path: &Path,
    output_root: &Path,
) -> Result<()> {
    if args.clean && output_root.exists() {
        std::fs::remove_dir_all(output_root).with_context(|| {
            format!("Failed to remove output root '{}'", output_root.display())
        })?;
    }

    let config = PipelineConfig {
        buffer_size: args.buffer_size.get(),
        progress_interval: args.progress.unwrap_or(0),
        skip_empty: args.skip_empty,
        compression: args.compression,
    };

    let router = OutputRouter::new(RouterConfig {
        output_root: output_root.to_path_buf(),
        file_name: args.file_name.clone(),
        language_field: args.language_field.clone(),
        default_language: args.default_language.clone(),
        buffer_size: args.buffer_size.get(),
    });

    let input = open_input(input_path, config.compression, config.buffer_size)
        .with_context(|| format!("Failed to open input '{}'", input_path.display()))?;

    info!(input = %input_path.display(), output = %output_root.display(), "processing");
    let pipeline = StreamPipeline::new(config, parser_config.vocabulary(), router);
    let stats = pipeline
        .process_stream(input)
        .context("Processing failed")?;

    for (path, records) in &stats.destinations {
        tracing::debug!(path = %path.display(), records, "destination written");
    }
    info!(
        lines = stats.lines_read,
        records = stats.records_parsed,
        written = stats.records_written,
        skipped = stats.records_skipped,
        destinations = stats.destinations.len(),
        elapsed = %humantime::format_duration(Duration::from_millis(
            stats.processing_time.as_millis() as u64
        )),
        "done"
    );

    Ok(())
}
