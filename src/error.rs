//! Error types for the mdpress library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] — the conversion of a file cannot complete (bad
//!   extension, unreadable input, rendering backend reported failure).
//!   Returned as `Err(ConvertError)` from [`crate::service::ConversionService`]
//!   and mapped to an HTTP status or a nonzero exit code at the boundary.
//!
//! * [`ArchiveError`] — the metadata archiver could not record a conversion.
//!   Archiving is best-effort by contract: the service logs these and carries
//!   on, so this type never crosses the service boundary.
//!
//! The rendering adapter itself returns neither — it captures every internal
//! failure into [`crate::model::ConversionResult`] data so batch callers get
//! a per-file outcome instead of an unwound stack.

use std::path::PathBuf;
use thiserror::Error;

/// All errors surfaced by the conversion service.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Input file exists but could not be read or was not valid UTF-8.
    #[error("failed to read '{path}': {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input extension is not one of `.md`, `.markdown`, `.txt`.
    #[error("unsupported file format: '{extension}'\nOnly .md, .markdown, and .txt are supported.")]
    UnsupportedFormat { extension: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The rendering backend reported a failure for this document.
    #[error("conversion failed: {detail}")]
    RenderFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors internal to the metadata archiver.
///
/// Swallowed (and logged) by the service; a failed archive write must never
/// fail the conversion that produced it.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Could not create the metadata directory or append to the daily log.
    #[error("archive write failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata record could not be serialised to JSON.
    #[error("archive record serialisation failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = ConvertError::UnsupportedFormat {
            extension: ".exe".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains(".exe"), "got: {msg}");
        assert!(msg.contains(".markdown"));
    }

    #[test]
    fn render_failed_display() {
        let e = ConvertError::RenderFailed {
            detail: "layout engine rejected the document".into(),
        };
        assert!(e.to_string().contains("layout engine"));
    }

    #[test]
    fn file_not_found_display() {
        let e = ConvertError::FileNotFound {
            path: PathBuf::from("missing.md"),
        };
        assert!(e.to_string().contains("missing.md"));
    }

    #[test]
    fn archive_io_display() {
        let e = ArchiveError::Io {
            path: PathBuf::from("/readonly/metadata/2026-08-06.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("2026-08-06.jsonl"));
    }
}
