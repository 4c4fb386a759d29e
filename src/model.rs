//! Domain value types for a single conversion.
//!
//! A [`ConversionRequest`] travels *into* the rendering port and a
//! [`ConversionResult`] travels back out. Both are plain owned values — they
//! flow by value through the pipeline and nothing holds them across calls.
//!
//! The result's success/failure invariant is enforced by construction:
//! [`ConversionResult::succeeded`] requires a path and a positive size,
//! [`ConversionResult::failed`] requires an error message. Code elsewhere can
//! rely on `success == true ⇒ non-empty path, size > 0` without re-checking.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Recognised source document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Markdown (`.md`, `.markdown`).
    #[serde(rename = "md")]
    Markdown,
    /// Plain text (`.txt`).
    #[serde(rename = "txt")]
    Text,
}

impl SourceFormat {
    /// Map a file extension (with or without the leading dot, any case) to a
    /// format. Returns `None` for anything unrecognised.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "md" | "markdown" => Some(SourceFormat::Markdown),
            "txt" => Some(SourceFormat::Text),
            _ => None,
        }
    }

    /// Wire value used in archive records.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Markdown => "md",
            SourceFormat::Text => "txt",
        }
    }
}

/// One document to convert: raw content plus the little context the renderer
/// needs. Immutable after construction.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Full UTF-8 text of the source document.
    pub content: String,
    /// Detected source format.
    pub source_format: SourceFormat,
    /// Desired output file name (a `.pdf` extension is appended if missing).
    pub output_filename: String,
    /// When the request was constructed.
    pub created_at: DateTime<Local>,
}

impl ConversionRequest {
    /// Build a request stamped with the current time.
    pub fn new(
        content: impl Into<String>,
        source_format: SourceFormat,
        output_filename: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            source_format,
            output_filename: output_filename.into(),
            created_at: Local::now(),
        }
    }
}

/// Outcome of one rendering attempt.
///
/// The rendering port never fails — a broken document comes back as
/// `success == false` with the reason in `error_message`, so batch callers
/// always get one result per file.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Absolute path of the generated PDF; empty string on failure.
    pub file_path: String,
    /// Size of the generated PDF in bytes; 0 on failure.
    pub size_bytes: u64,
    /// Whether the PDF was produced.
    pub success: bool,
    /// Timestamp carried over from the originating request.
    pub created_at: DateTime<Local>,
    /// Failure reason; always present when `success == false`.
    pub error_message: Option<String>,
}

impl ConversionResult {
    /// A successful result. `size_bytes` must be positive — a zero-byte PDF
    /// is a rendering failure, not a success.
    pub fn succeeded(file_path: &Path, size_bytes: u64, created_at: DateTime<Local>) -> Self {
        debug_assert!(size_bytes > 0, "successful result requires a non-empty file");
        Self {
            file_path: file_path.display().to_string(),
            size_bytes,
            success: true,
            created_at,
            error_message: None,
        }
    }

    /// A failed result carrying the original request timestamp.
    pub fn failed(error_message: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            file_path: String::new(),
            size_bytes: 0,
            success: false,
            created_at,
            error_message: Some(error_message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(SourceFormat::from_extension(".md"), Some(SourceFormat::Markdown));
        assert_eq!(
            SourceFormat::from_extension("markdown"),
            Some(SourceFormat::Markdown)
        );
        assert_eq!(SourceFormat::from_extension(".TXT"), Some(SourceFormat::Text));
        assert_eq!(SourceFormat::from_extension(".exe"), None);
        assert_eq!(SourceFormat::from_extension(""), None);
    }

    #[test]
    fn format_wire_values() {
        assert_eq!(SourceFormat::Markdown.as_str(), "md");
        assert_eq!(SourceFormat::Text.as_str(), "txt");
    }

    #[test]
    fn successful_result_invariant() {
        let r = ConversionResult::succeeded(&PathBuf::from("/out/doc.pdf"), 1024, Local::now());
        assert!(r.success);
        assert!(!r.file_path.is_empty());
        assert!(r.size_bytes > 0);
        assert!(r.error_message.is_none());
    }

    #[test]
    fn failed_result_invariant() {
        let r = ConversionResult::failed("renderer exploded", Local::now());
        assert!(!r.success);
        assert!(r.file_path.is_empty());
        assert_eq!(r.size_bytes, 0);
        assert_eq!(r.error_message.as_deref(), Some("renderer exploded"));
    }

    #[test]
    fn failed_result_keeps_request_timestamp() {
        let req = ConversionRequest::new("# x", SourceFormat::Markdown, "x.pdf");
        let r = ConversionResult::failed("boom", req.created_at);
        assert_eq!(r.created_at, req.created_at);
    }
}
