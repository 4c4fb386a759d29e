//! Archiver adapter: metadata-only conversion history.
//!
//! Stores one JSON line per conversion attempt — timestamps, sizes, a
//! SHA-256 content hash, success/error status and simple structural metrics.
//! File contents are never copied; the hash prefix in the run id is advisory
//! deduplication bookkeeping, no lookup or rejection of duplicates happens.
//!
//! Records land in `<archive_dir>/metadata/<YYYY-MM-DD>.jsonl`, one file per
//! day, opened in append mode per write. Whole-line appends from concurrent
//! processes are best-effort: POSIX append mode keeps each `write(2)` atomic
//! for small lines on local filesystems, but nothing here serialises writers
//! across processes. An interleaved line in the advisory log is acceptable;
//! blocking a conversion on it is not.

use crate::error::ArchiveError;
use crate::model::{ConversionRequest, ConversionResult};
use crate::ports::Archiver;
use chrono::Local;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// One persisted line of conversion history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// `<YYYYmmdd_HHMMSS>_<first 8 hex chars of content hash>`.
    pub run_id: String,
    /// Full RFC 3339 timestamp of the archive write.
    pub timestamp: String,
    /// `YYYY-MM-DD`, duplicated out of the timestamp for cheap grepping.
    pub date: String,
    /// `HH:MM:SS`.
    pub time: String,
    pub original_filename: String,
    pub source_format: String,
    pub input_size_bytes: u64,
    pub output_size_bytes: u64,
    /// SHA-256 of the UTF-8 input content.
    pub content_hash: String,
    pub success: bool,
    pub error: Option<String>,
    pub word_count: usize,
    pub line_count: usize,
    pub char_count: usize,
}

/// Day-partitioned JSONL archiver.
#[derive(Debug)]
pub struct JsonlArchiver {
    meta_dir: PathBuf,
}

impl JsonlArchiver {
    /// Create an archiver rooted at `archive_dir`; records go to its
    /// `metadata/` subdirectory (created lazily on first write).
    pub fn new(archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            meta_dir: archive_dir.into().join("metadata"),
        }
    }

    fn content_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn build_record(request: &ConversionRequest, result: &ConversionResult) -> ArchiveRecord {
        let now = Local::now();
        let content_hash = Self::content_hash(&request.content);
        let run_id = format!("{}_{}", now.format("%Y%m%d_%H%M%S"), &content_hash[..8]);

        ArchiveRecord {
            run_id,
            timestamp: now.to_rfc3339(),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            original_filename: request.output_filename.clone(),
            source_format: request.source_format.as_str().to_string(),
            input_size_bytes: request.content.len() as u64,
            output_size_bytes: result.size_bytes,
            content_hash,
            success: result.success,
            error: result.error_message.clone(),
            word_count: request.content.split_whitespace().count(),
            line_count: request.content.lines().count(),
            char_count: request.content.chars().count(),
        }
    }
}

impl Archiver for JsonlArchiver {
    fn archive(
        &self,
        request: &ConversionRequest,
        result: &ConversionResult,
    ) -> Result<(), ArchiveError> {
        let record = Self::build_record(request, result);

        std::fs::create_dir_all(&self.meta_dir).map_err(|e| ArchiveError::Io {
            path: self.meta_dir.clone(),
            source: e,
        })?;

        let daily_file = self.meta_dir.join(format!("{}.jsonl", record.date));
        let line = serde_json::to_string(&record)?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&daily_file)
            .map_err(|e| ArchiveError::Io {
                path: daily_file.clone(),
                source: e,
            })?;
        // One write call per record keeps the line append as close to atomic
        // as the platform allows.
        writeln!(file, "{line}").map_err(|e| ArchiveError::Io {
            path: daily_file.clone(),
            source: e,
        })?;

        info!(run_id = %record.run_id, "archived conversion metadata");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceFormat;
    use std::path::Path;

    fn sample_pair() -> (ConversionRequest, ConversionResult) {
        let request = ConversionRequest::new(
            "# Title\n\nTwo words here.",
            SourceFormat::Markdown,
            "title.pdf",
        );
        let result =
            ConversionResult::succeeded(Path::new("/out/title.pdf"), 2048, request.created_at);
        (request, result)
    }

    #[test]
    fn archive_appends_one_json_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = JsonlArchiver::new(dir.path());
        let (request, result) = sample_pair();

        archiver.archive(&request, &result).unwrap();
        archiver.archive(&request, &result).unwrap();

        let date = Local::now().format("%Y-%m-%d").to_string();
        let daily = dir.path().join("metadata").join(format!("{date}.jsonl"));
        let contents = std::fs::read_to_string(daily).unwrap();
        assert_eq!(contents.lines().count(), 2);

        let record: ArchiveRecord = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(record.original_filename, "title.pdf");
        assert_eq!(record.source_format, "md");
        assert_eq!(record.output_size_bytes, 2048);
        assert!(record.success);
        assert_eq!(record.word_count, 5);
        assert_eq!(record.line_count, 3);
    }

    #[test]
    fn run_id_embeds_hash_prefix() {
        let (request, result) = sample_pair();
        let record = JsonlArchiver::build_record(&request, &result);
        let hash = JsonlArchiver::content_hash(&request.content);
        assert!(record.run_id.ends_with(&hash[..8]), "got: {}", record.run_id);
        assert_eq!(record.content_hash, hash);
        assert_eq!(record.content_hash.len(), 64);
    }

    #[test]
    fn failed_result_is_recorded_with_error() {
        let request = ConversionRequest::new("broken", SourceFormat::Text, "broken.pdf");
        let result = ConversionResult::failed("layout rejected", request.created_at);
        let record = JsonlArchiver::build_record(&request, &result);
        assert!(!record.success);
        assert_eq!(record.error.as_deref(), Some("layout rejected"));
        assert_eq!(record.output_size_bytes, 0);
    }

    #[test]
    fn unwritable_archive_dir_returns_err_without_panicking() {
        // A file standing where the metadata directory should be makes
        // create_dir_all fail.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("archive");
        std::fs::write(&blocker, "not a directory").unwrap();

        let archiver = JsonlArchiver::new(&blocker);
        let (request, result) = sample_pair();
        let err = archiver.archive(&request, &result).unwrap_err();
        assert!(matches!(err, ArchiveError::Io { .. }));
    }
}
