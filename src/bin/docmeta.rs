use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docmeta::{
    config, extraction::TextExtractor, logging, ner, processing::PipelineOptions,
    processing::run_pipeline, render,
};

#[derive(Parser)]
#[command(
    name = "docmeta",
    about = "Extract title, summary, keywords, and named entities from a PDF, DOCX, or TXT file"
)]
struct Cli {
    /// Document to process; the format is taken from its extension.
    file: PathBuf,
    /// Sentences kept in the summary.
    #[arg(long)]
    sentences: Option<usize>,
    /// Keywords returned.
    #[arg(long)]
    keywords: Option<usize>,
    /// Trimmed PDF text length below which OCR runs.
    #[arg(long)]
    ocr_threshold: Option<usize>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` when the document was rejected as unsupported.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init_cli_tracing(cli.verbose);
    let config = config::init_config().context("Failed to load configuration")?;

    let defaults = PipelineOptions::from_config(config);
    let options = PipelineOptions {
        sentence_count: cli.sentences.unwrap_or(defaults.sentence_count),
        max_keywords: cli.keywords.unwrap_or(defaults.max_keywords),
        ocr_min_text_chars: cli.ocr_threshold.unwrap_or(defaults.ocr_min_text_chars),
    };

    let recognizer =
        ner::init_recognizer(config).context("Failed to initialize entity recognizer")?;
    let extractor = TextExtractor::from_config(config);
    let output = run_pipeline(&cli.file, &extractor, recognizer.as_ref(), &options)
        .with_context(|| format!("Failed to process {}", cli.file.display()))?;

    let rendered = match (cli.format, cli.pretty) {
        (OutputFormat::Text, _) => render::plain_text(&output),
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&output)? + "\n",
        (OutputFormat::Json, false) => serde_json::to_string(&output)? + "\n",
    };
    print!("{rendered}");
    Ok(!output.is_error())
}
