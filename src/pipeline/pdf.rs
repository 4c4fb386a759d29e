//! PDF generation: composed HTML → PDF bytes via printpdf.
//!
//! This is the only stage that touches the rendering backend. printpdf's
//! HTML layout engine takes the whole document (markup + embedded CSS) and
//! returns the finished byte stream; we pass empty image/font maps because
//! documents here embed neither, and surface layout warnings at DEBUG so a
//! misbehaving stylesheet can be diagnosed without failing the conversion.

use printpdf::{GeneratePdfOptions, PdfDocument};
use std::collections::BTreeMap;
use tracing::debug;

/// Render a complete HTML document to PDF bytes.
///
/// Returns a plain `Err(String)` — the caller
/// ([`crate::render::HtmlPdfRenderer`]) folds any failure into a
/// [`crate::model::ConversionResult`] rather than propagating it.
pub fn html_to_pdf(html: &str) -> Result<Vec<u8>, String> {
    let mut warnings = Vec::new();

    let doc = PdfDocument::from_html(
        html,
        &BTreeMap::new(), // images
        &BTreeMap::new(), // fonts
        &GeneratePdfOptions::default(),
        &mut warnings,
    )
    .map_err(|e| format!("PDF layout failed: {e}"))?;

    if !warnings.is_empty() {
        debug!(count = warnings.len(), "PDF generation produced warnings");
    }

    doc.save(&Default::default())
        .map_err(|e| format!("PDF serialisation failed: {e}"))
}
