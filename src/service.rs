//! Conversion service: orchestrates one file's journey from input path to
//! output PDF.
//!
//! The flow is linear — read → classify → render → archive → report — with
//! no retries and no partial-success states. The service owns no mutable
//! state; one instance is shared across CLI, batch and HTTP callers behind
//! an `Arc`.
//!
//! Failure translation happens at exactly two seams: the rendering port
//! reports failures as result *data* (so batch callers always get a per-file
//! outcome), which this service re-raises as
//! [`ConvertError::RenderFailed`]; the archive port reports failures as an
//! `Err` which this service logs and swallows — recording history must never
//! break the conversion that produced it.

use crate::error::ConvertError;
use crate::model::{ConversionRequest, SourceFormat};
use crate::ports::{Archiver, FileStore, PdfRenderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Orchestrator for single-file conversions.
pub struct ConversionService {
    renderer: Arc<dyn PdfRenderer>,
    store: Arc<dyn FileStore>,
    archiver: Option<Arc<dyn Archiver>>,
}

impl ConversionService {
    /// Build a service without archiving.
    pub fn new(renderer: Arc<dyn PdfRenderer>, store: Arc<dyn FileStore>) -> Self {
        Self {
            renderer,
            store,
            archiver: None,
        }
    }

    /// Attach a metadata archiver (best-effort; see module docs).
    pub fn with_archiver(mut self, archiver: Arc<dyn Archiver>) -> Self {
        self.archiver = Some(archiver);
        self
    }

    /// Access to the underlying file store, for callers that scan
    /// directories with the same adapter the service reads through.
    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.store
    }

    /// Detect the source format from a path's extension.
    fn detect_format(path: &Path) -> Result<SourceFormat, ConvertError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();

        SourceFormat::from_extension(&extension).ok_or_else(|| {
            error!(path = %path.display(), extension = %extension, "unsupported extension");
            ConvertError::UnsupportedFormat { extension }
        })
    }

    /// Convert `input_path` to a PDF at `output_path`.
    ///
    /// Returns the absolute path of the generated file. `output_path`'s
    /// parent is the render target directory (current directory when the
    /// path has no parent component).
    pub fn convert_file(
        &self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<PathBuf, ConvertError> {
        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "starting conversion job"
        );

        let content = self.store.read_file(input_path)?;
        let source_format = Self::detect_format(input_path)?;

        let output_filename = output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let request = ConversionRequest::new(content, source_format, output_filename);

        let output_dir = match output_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let result = self.renderer.render(&request, output_dir);

        if let Some(archiver) = &self.archiver {
            if let Err(e) = archiver.archive(&request, &result) {
                // Best-effort only: history must never block the conversion.
                warn!(error = %e, "failed to archive conversion metadata");
            }
        }

        if !result.success {
            let detail = result
                .error_message
                .unwrap_or_else(|| "unknown rendering failure".to_string());
            error!(error = %detail, "conversion failed");
            return Err(ConvertError::RenderFailed { detail });
        }

        info!(size_bytes = result.size_bytes, "conversion successful");
        Ok(PathBuf::from(result.file_path))
    }
}
