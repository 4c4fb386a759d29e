//! CLI binary for mdpress.
//!
//! A thin shim over the library crate that maps CLI flags to the conversion
//! service and prints results.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use mdpress::{
    api::{self, AppState},
    batch::BATCH_EXTENSIONS,
    run_batch, ConversionService, FileStore, HtmlPdfRenderer, JsonlArchiver, LocalFileStore,
    ServiceConfig,
};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one file (output next to the input)
  mdpress convert notes.md

  # Convert to an explicit path
  mdpress convert report.markdown -o out/report.pdf

  # Convert everything in data/input to data/output
  mdpress batch

  # Batch with custom directories
  mdpress batch --input-dir content/drafts --output-dir content/pdf

  # Run the HTTP API
  mdpress serve --port 8000

SUPPORTED INPUT FORMATS:
  .md  .markdown    Markdown (tables, fenced code, footnotes)
  .txt              Plain text (rendered preformatted)

CONVERSION HISTORY:
  Every attempt appends one JSON line of metadata (sizes, SHA-256 content
  hash, success/error) to data/archive/metadata/<date>.jsonl. Document
  contents are never copied there.

ENVIRONMENT VARIABLES:
  RUST_LOG   Override the log filter (e.g. RUST_LOG=mdpress=debug)
"#;

/// Convert Markdown and plain-text documents to styled PDF.
#[derive(Parser, Debug)]
#[command(
    name = "mdpress",
    version,
    about = "Convert Markdown and plain-text documents to styled PDF",
    long_about = "Convert Markdown (.md, .markdown) and plain-text (.txt) documents into \
styled A4 PDF files. One conversion pipeline backs all three modes: single-file, \
batch directory processing, and an HTTP API.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "MDPRESS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "MDPRESS_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single Markdown or text file to PDF.
    Convert {
        /// Path to the source file (.md, .markdown, or .txt).
        input: PathBuf,

        /// Path to the output PDF. Defaults to the input path with a .pdf
        /// extension.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert every .md/.txt file in a directory, one at a time.
    Batch {
        /// Directory scanned for source files.
        #[arg(long, default_value = "data/input")]
        input_dir: PathBuf,

        /// Directory PDFs are written to (created if absent).
        #[arg(long, default_value = "data/output")]
        output_dir: PathBuf,
    },

    /// Run the HTTP conversion API.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1", env = "MDPRESS_HOST")]
        host: String,

        /// Port to bind.
        #[arg(short, long, default_value_t = 8000, env = "MDPRESS_PORT")]
        port: u16,
    },
}

fn build_service(config: &ServiceConfig) -> ConversionService {
    ConversionService::new(
        Arc::new(HtmlPdfRenderer::new()),
        Arc::new(LocalFileStore::new()),
    )
    .with_archiver(Arc::new(JsonlArchiver::new(config.archive_dir.clone())))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = ServiceConfig::default();

    match cli.command {
        Command::Convert { input, output } => {
            if !input.exists() {
                bail!("Input file '{}' does not exist.", input.display());
            }
            let output = output.unwrap_or_else(|| input.with_extension("pdf"));

            if !cli.quiet {
                eprintln!(
                    "Converting {} to {}…",
                    bold(&input.display().to_string()),
                    bold(&output.display().to_string())
                );
            }

            let service = build_service(&config);
            let result_path = service
                .convert_file(&input, &output)
                .context("Conversion failed")?;

            if !cli.quiet {
                eprintln!(
                    "{} PDF generated at: {}",
                    green("✔"),
                    bold(&result_path.display().to_string())
                );
            }
        }

        Command::Batch {
            input_dir,
            output_dir,
        } => {
            let service = build_service(&config);

            let files = service
                .store()
                .list_files(&input_dir, BATCH_EXTENSIONS)
                .context("Failed to scan input directory")?;

            if files.is_empty() {
                println!(
                    "No files found in {}. Add .md or .txt files there.",
                    input_dir.display()
                );
                return Ok(());
            }

            println!("Found {} file(s). Processing…", files.len());

            // Per-file progress belongs on stdout alongside the summary.
            let bar = ProgressBar::with_draw_target(
                Some(files.len() as u64),
                indicatif::ProgressDrawTarget::stdout(),
            );
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} [{bar:42.green/238}] {pos:>3}/{len} files",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
            );

            let summary = run_batch(&service, &input_dir, &output_dir, |outcome| {
                match outcome.status.as_str() {
                    "success" => bar.println(format!("  {} {}", green("✓"), outcome.file)),
                    _ => bar.println(format!(
                        "  {} {}  {}",
                        red("✗"),
                        outcome.file,
                        dim(outcome.error.as_deref().unwrap_or("unknown error"))
                    )),
                }
                bar.inc(1);
            })
            .context("Batch conversion failed")?;

            bar.finish_and_clear();
            if summary.failed == 0 {
                println!(
                    "{} {} file(s) converted to {}",
                    green("✔"),
                    bold(&summary.successful.to_string()),
                    output_dir.display()
                );
            } else {
                println!(
                    "{}/{} file(s) converted  ({} failed)",
                    bold(&summary.successful.to_string()),
                    summary.processed,
                    red(&summary.failed.to_string()),
                );
            }
        }

        Command::Serve { host, port } => {
            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("Invalid bind address '{host}:{port}'"))?;

            let state = AppState {
                service: Arc::new(build_service(&config)),
                config: Arc::new(config),
            };

            api::serve(addr, state).await.context("HTTP server failed")?;
        }
    }

    Ok(())
}
