//! # mdpress
//!
//! Convert Markdown and plain-text documents into styled PDF files, through
//! a CLI, a batch mode, or an HTTP API.
//!
//! ## Why this crate?
//!
//! "Turn these notes into a PDF" sounds trivial until the same conversion
//! has to be reachable from a terminal, a cron-driven drop folder, and a web
//! upload form — with one styling, one error taxonomy, and one history
//! trail. This crate keeps a single orchestration pipeline behind small
//! trait seams (ports) so the three entry points share every behaviour and
//! the rendering, storage and archival backends stay swappable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document (.md / .markdown / .txt)
//!  │
//!  ├─ 1. Read      fetch content through the FileStore port
//!  ├─ 2. Classify  detect the source format from the extension
//!  ├─ 3. Render    normalise lists → HTML + fixed A4 stylesheet → PDF
//!  ├─ 4. Archive   append one JSONL metadata record (best-effort)
//!  └─ 5. Report    absolute output path, or a typed ConvertError
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdpress::{ConversionService, HtmlPdfRenderer, JsonlArchiver, LocalFileStore};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ConversionService::new(
//!         Arc::new(HtmlPdfRenderer::new()),
//!         Arc::new(LocalFileStore::new()),
//!     )
//!     .with_archiver(Arc::new(JsonlArchiver::new("data/archive")));
//!
//!     let pdf = service.convert_file(Path::new("notes.md"), Path::new("notes.pdf"))?;
//!     println!("wrote {}", pdf.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdpress` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! mdpress = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod fs;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod render;
pub mod service;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use archive::{ArchiveRecord, JsonlArchiver};
pub use batch::{run_batch, BatchSummary, FileOutcome};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::{ArchiveError, ConvertError};
pub use fs::LocalFileStore;
pub use model::{ConversionRequest, ConversionResult, SourceFormat};
pub use ports::{Archiver, FileStore, PdfRenderer};
pub use render::HtmlPdfRenderer;
pub use service::ConversionService;
