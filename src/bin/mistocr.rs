//! CLI binary for mistocr.
//!
//! A thin shim over the library crate that maps CLI flags to the OCR
//! client and formatters and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mistocr::{
    config, parse_pages, to_markdown, to_pdf, to_text, validate_input, OcrClient, OutputFormat,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # OCR a document to Markdown (stdout)
  mistocr scan.pdf

  # Write Markdown to a file
  mistocr scan.pdf -o scan.md

  # Only pages 0, 2, 3, 4 and 7 (zero-based)
  mistocr --pages 0,2-4,7 scan.pdf

  # Plain text, no images
  mistocr -f text --no-images deck.pptx

  # Save extracted images next to the Markdown instead of embedding them
  mistocr scan.pdf -o scan.md --images-dir scan_images

  # Generate a PDF report (format inferred from the output extension)
  mistocr scan.pdf -o report.pdf

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY   Mistral API key; overrides the stored credential

CREDENTIALS:
  The API key is looked up in MISTRAL_API_KEY first, then in the platform
  keyring. When neither is set, mistocr prompts once (no echo) and stores
  the key in the keyring for subsequent runs.
"#;

/// OCR documents with the Mistral AI OCR API.
#[derive(Parser, Debug)]
#[command(
    name = "mistocr",
    version,
    about = "OCR PDFs and slide decks with the Mistral AI OCR API",
    long_about = "Process documents (PDF or PPTX) with the Mistral AI OCR API and render the \
per-page results as Markdown, plain text, or a generated PDF report.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the document to process (.pdf or .pptx).
    file: PathBuf,

    /// Output file path. If not specified, output is printed to stdout.
    #[arg(short, long, env = "MISTOCR_OUTPUT")]
    output: Option<PathBuf>,

    /// Output format. Defaults to markdown, or pdf when --output ends in .pdf.
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Pages to process, zero-based (e.g. "0,1,3-5"). All pages if omitted.
    #[arg(long, env = "MISTOCR_PAGES")]
    pages: Option<String>,

    /// Include images in the output (default).
    #[arg(long, overrides_with = "no_images")]
    images: bool,

    /// Exclude images from the output.
    #[arg(long)]
    no_images: bool,

    /// Directory to save extracted images instead of embedding them.
    #[arg(long, env = "MISTOCR_IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MISTOCR_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result itself.
    #[arg(short, long, env = "MISTOCR_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Markdown,
    Text,
    Pdf,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Pdf => OutputFormat::Pdf,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner is all the feedback a normal run needs; suppress INFO
    // library logs unless the user asked for them.
    let show_progress = !cli.quiet;
    let filter = if cli.verbose { "debug" } else { "error" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Validate inputs before touching the network ──────────────────────
    validate_input(&cli.file)?;
    let pages = parse_pages(cli.pages.as_deref())?;

    let format = OutputFormat::infer(cli.format.clone().map(Into::into), cli.output.as_deref());
    if format == OutputFormat::Pdf && cli.output.is_none() {
        anyhow::bail!("PDF output requires an output file path. Use -o/--output.");
    }

    // ── Resolve credential ───────────────────────────────────────────────
    let api_key = config::ensure_api_key().ok_or(mistocr::OcrError::MissingApiKey)?;

    // ── Remote OCR call ──────────────────────────────────────────────────
    let include_images = cli.images || !cli.no_images;
    // The service is asked for images whenever anything downstream might
    // want them — embedding or externalising.
    let request_images = include_images || cli.images_dir.is_some();

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        pb.set_message(format!("Running OCR on {}…", cli.file.display()));
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    } else {
        None
    };

    let client = OcrClient::new(api_key);
    let result = client
        .process(&cli.file, pages.as_deref(), request_images)
        .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let result = result.context("OCR processing failed")?;

    // ── Format and emit ──────────────────────────────────────────────────
    match format {
        OutputFormat::Pdf => {
            let output_path = cli
                .output
                .as_ref()
                .context("PDF output requires an output file path")?;
            to_pdf(&result, output_path, include_images).context("PDF formatting failed")?;
            if !cli.quiet {
                eprintln!(
                    "{} PDF output written to: {}",
                    green("✔"),
                    bold(&output_path.display().to_string())
                );
            }
        }
        OutputFormat::Markdown | OutputFormat::Text => {
            let formatted = match format {
                OutputFormat::Markdown => {
                    to_markdown(&result, include_images, cli.images_dir.as_deref())
                }
                _ => to_text(&result),
            };

            match cli.output {
                Some(ref path) => {
                    std::fs::write(path, &formatted)
                        .with_context(|| format!("Failed to write output to {}", path.display()))?;
                    if !cli.quiet {
                        eprintln!(
                            "{} Output written to: {}  {}",
                            green("✔"),
                            bold(&path.display().to_string()),
                            dim(&format!("{} bytes", formatted.len())),
                        );
                    }
                }
                None => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    handle
                        .write_all(formatted.as_bytes())
                        .context("Failed to write to stdout")?;
                    if !formatted.ends_with('\n') {
                        handle.write_all(b"\n").ok();
                    }
                }
            }
        }
    }

    Ok(())
}
