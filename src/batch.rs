//! Batch conversion: run every `.md`/`.txt` file in a directory through the
//! service, strictly sequentially, isolating failures per file.
//!
//! Shared by the CLI `batch` subcommand and the HTTP `/bulk-convert`
//! endpoint so the two report identical summaries.

use crate::error::ConvertError;
use crate::ports::FileStore;
use crate::service::ConversionService;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Extensions picked up by a directory scan.
pub const BATCH_EXTENSIONS: &[&str] = &[".md", ".txt"];

/// Outcome for one file of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Input file name (no directory component).
    pub file: String,
    /// `"success"`, `"error"`, or (multi-upload only) `"skipped"`.
    pub status: String,
    /// Failure reason when status is not `"success"`.
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn success(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: "success".into(),
            error: None,
        }
    }

    pub fn error(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: "error".into(),
            error: Some(error.into()),
        }
    }

    pub fn skipped(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: "skipped".into(),
            error: Some(reason.into()),
        }
    }
}

/// Summary of one batch run, serialised verbatim by `/bulk-convert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub message: String,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<FileOutcome>,
}

impl BatchSummary {
    fn empty() -> Self {
        Self {
            message: "No files found to process".into(),
            processed: 0,
            successful: 0,
            failed: 0,
            results: Vec::new(),
        }
    }
}

/// Convert every matching file under `input_dir` into `output_dir`.
///
/// Files are processed one at a time in sorted order; a failure is recorded
/// in the summary and processing continues with the next file. `on_file` is
/// invoked once per file, after its outcome is known — drive progress
/// output from it.
pub fn run_batch(
    service: &ConversionService,
    input_dir: &Path,
    output_dir: &Path,
    mut on_file: impl FnMut(&FileOutcome),
) -> Result<BatchSummary, ConvertError> {
    std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::OutputWriteFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let files = service.store().list_files(input_dir, BATCH_EXTENSIONS)?;
    if files.is_empty() {
        warn!(dir = %input_dir.display(), "no files found to process");
        return Ok(BatchSummary::empty());
    }

    info!(count = files.len(), "starting batch conversion");

    let mut results = Vec::with_capacity(files.len());
    let mut successful = 0;

    for input_path in &files {
        let file_name = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());
        let output_path = output_dir.join(format!("{stem}.pdf"));

        let outcome = match service.convert_file(input_path, &output_path) {
            Ok(_) => {
                successful += 1;
                FileOutcome::success(&file_name)
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "batch item failed");
                FileOutcome::error(&file_name, e.to_string())
            }
        };
        on_file(&outcome);
        results.push(outcome);
    }

    let processed = results.len();
    info!(successful, processed, "batch conversion completed");

    Ok(BatchSummary {
        message: "Bulk conversion completed".into(),
        processed,
        successful,
        failed: processed - successful,
        results,
    })
}
