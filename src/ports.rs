//! Capability interfaces (ports) implemented by swappable adapters.
//!
//! The orchestrator in [`crate::service`] is written against these three
//! traits only; concrete technology lives in the adapters
//! ([`crate::render::HtmlPdfRenderer`], [`crate::fs::LocalFileStore`],
//! [`crate::archive::JsonlArchiver`]). Handing the service a different
//! implementation — an in-memory store in tests, a recording renderer —
//! requires no changes here or there.
//!
//! All three are `Send + Sync` and used as `Arc<dyn …>` so one service
//! instance can be shared across HTTP handler tasks.

use crate::error::{ArchiveError, ConvertError};
use crate::model::{ConversionRequest, ConversionResult};
use std::path::{Path, PathBuf};

/// Renders one request to a PDF file on disk.
pub trait PdfRenderer: Send + Sync {
    /// Render `request` into `output_dir`.
    ///
    /// Never fails: every internal error is captured into the returned
    /// [`ConversionResult`] (`success == false`, message set) so multi-file
    /// callers keep going on a per-file basis.
    fn render(&self, request: &ConversionRequest, output_dir: &Path) -> ConversionResult;
}

/// File content access for the conversion pipeline.
pub trait FileStore: Send + Sync {
    /// Read a file as UTF-8 text. Fails with [`ConvertError::FileNotFound`]
    /// when the path does not exist prior to open.
    fn read_file(&self, path: &Path) -> Result<String, ConvertError>;

    /// Write bytes to `path`, returning the absolute path written.
    fn save_file(&self, path: &Path, bytes: &[u8]) -> Result<PathBuf, ConvertError>;

    /// List files directly inside `dir` matching any of `extensions`
    /// (single level, no recursion). An absent directory yields an empty
    /// list, not an error.
    fn list_files(&self, dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, ConvertError>;
}

/// Records conversion metadata for project history.
pub trait Archiver: Send + Sync {
    /// Persist one metadata record for a request/result pair.
    ///
    /// The caller treats this as best-effort: the service logs an `Err` and
    /// continues, so implementations should not bother retrying.
    fn archive(
        &self,
        request: &ConversionRequest,
        result: &ConversionResult,
    ) -> Result<(), ArchiveError>;
}
