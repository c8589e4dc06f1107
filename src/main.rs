//! bookmeta - ebook metadata extractor

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use bookmeta::export::{CsvExporter, Exporter, JsonExporter, OutputFormat, TextExporter};
use bookmeta::{Error, MetadataMap, ReadOptions, path_metadata, read_batch};

#[derive(Parser)]
#[command(name = "bookmeta")]
#[command(version, about = "Extract metadata from EPUB and Kindle ebooks", long_about = None)]
#[command(after_help = "EXAMPLES:
    bookmeta book.epub                  Show book metadata
    bookmeta '*.mobi' '*.azw3'          Show metadata of every match
    bookmeta '*.epub' -o books.csv      Also write it to a CSV file")]
struct Cli {
    /// Ebook files or glob patterns (EPUB, MOBI, AZW, AZW3, KFX)
    #[arg(value_name = "PATTERN", required = true)]
    patterns: Vec<String>,

    /// Write metadata to a .json or .csv file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Separator for fields with several values
    #[arg(short, long, default_value = bookmeta::DEFAULT_JOIN_SEPARATOR)]
    separator: String,

    /// Log decoding details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when at least one file could not be read.
fn run(cli: &Cli) -> Result<bool> {
    let output_format = cli
        .output
        .as_deref()
        .map(OutputFormat::from_path)
        .transpose()?;

    let paths = expand_patterns(&cli.patterns)?;
    if paths.is_empty() {
        bail!("no files matched: {}", cli.patterns.join(" "));
    }

    let options = ReadOptions {
        join_separator: cli.separator.clone(),
        ..ReadOptions::default()
    };

    let mut books = Vec::with_capacity(paths.len());
    let mut all_ok = true;
    for entry in read_batch(&paths, &options) {
        match entry.result {
            Ok(meta) => books.push(meta),
            Err(Error::MetadataAbsent(_)) => {
                warn!(path = %entry.path.display(), "no embedded metadata");
                books.push(path_metadata(&entry.path)?);
            }
            Err(e) => {
                eprintln!("error: {}: {e}", entry.path.display());
                all_ok = false;
            }
        }
    }

    let mut stdout = io::stdout().lock();
    TextExporter::new()
        .with_separator(&options.join_separator)
        .export(&books, &mut stdout)?;

    if let (Some(path), Some(format)) = (&cli.output, output_format) {
        write_output(path, format, &books)?;
    }

    Ok(all_ok)
}

/// Expand glob patterns; patterns without glob characters pass through.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();

    for pattern in patterns {
        if pattern.contains(['*', '?', '[']) {
            let matches =
                glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
            for entry in matches {
                let path = entry.context("Failed to read glob entry")?;
                if path.is_file() {
                    expanded.push(path);
                }
            }
        } else {
            expanded.push(PathBuf::from(pattern));
        }
    }

    Ok(expanded)
}

fn write_output(path: &Path, format: OutputFormat, books: &[MetadataMap]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => JsonExporter::new().pretty(true).export(books, &mut writer)?,
        OutputFormat::Csv => CsvExporter::new().export(books, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}
