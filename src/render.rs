//! Rendering adapter: [`HtmlPdfRenderer`] implements the
//! [`PdfRenderer`](crate::ports::PdfRenderer) port by running the pipeline
//! stages in order — preprocess (markdown only) → HTML composition → PDF
//! generation → write + measure.
//!
//! ## The never-fails contract
//!
//! This is the one place where errors are deliberately converted to data
//! rather than propagated. Batch callers need one outcome per file to keep
//! going; a renderer that unwound on the first bad document would turn a
//! 100-file batch into a lottery. Every internal failure — layout error,
//! disk full, metadata race — comes back as `ConversionResult::failed` with
//! the original request timestamp preserved.

use crate::model::{ConversionRequest, ConversionResult, SourceFormat};
use crate::pipeline::{html, pdf, preprocess};
use crate::ports::PdfRenderer;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Renders requests to styled PDFs via the HTML pipeline.
#[derive(Debug, Default)]
pub struct HtmlPdfRenderer;

impl HtmlPdfRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the output path: request filename with `.pdf` ensured,
    /// joined under `output_dir`.
    fn output_path(request: &ConversionRequest, output_dir: &Path) -> PathBuf {
        let mut filename = if request.output_filename.is_empty() {
            format!("output_{}.pdf", request.created_at.timestamp())
        } else {
            request.output_filename.clone()
        };
        if !filename.to_ascii_lowercase().ends_with(".pdf") {
            filename.push_str(".pdf");
        }
        output_dir.join(filename)
    }

    fn render_inner(request: &ConversionRequest, output_path: &Path) -> Result<u64, String> {
        let fragment = match request.source_format {
            SourceFormat::Markdown => {
                let normalized = preprocess::normalize_lists(&request.content);
                html::content_to_fragment(&normalized, SourceFormat::Markdown)
            }
            SourceFormat::Text => html::content_to_fragment(&request.content, SourceFormat::Text),
        };

        let document = html::compose_document(&fragment);
        let bytes = pdf::html_to_pdf(&document)?;

        std::fs::write(output_path, &bytes)
            .map_err(|e| format!("failed to write '{}': {e}", output_path.display()))?;

        let size = std::fs::metadata(output_path)
            .map_err(|e| format!("failed to stat '{}': {e}", output_path.display()))?
            .len();
        if size == 0 {
            return Err(format!("renderer produced an empty file at '{}'", output_path.display()));
        }
        Ok(size)
    }
}

impl PdfRenderer for HtmlPdfRenderer {
    fn render(&self, request: &ConversionRequest, output_dir: &Path) -> ConversionResult {
        let output_path = Self::output_path(request, output_dir);
        debug!(
            format = request.source_format.as_str(),
            output = %output_path.display(),
            "rendering document"
        );

        match Self::render_inner(request, &output_path) {
            Ok(size) => {
                let absolute = std::fs::canonicalize(&output_path).unwrap_or(output_path);
                ConversionResult::succeeded(&absolute, size, request.created_at)
            }
            Err(detail) => {
                warn!(error = %detail, "rendering failed");
                ConversionResult::failed(detail, request.created_at)
            }
        }
    }
}
