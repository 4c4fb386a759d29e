//! Pipeline stages for document-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. switch the PDF backend) without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! content ──▶ preprocess ──▶ html ──▶ pdf
//! (md/txt)    (list fixup)   (fragment   (printpdf)
//!                             + styling)
//! ```
//!
//! 1. [`preprocess`] — normalise markdown list spacing so the converter
//!    recognises lists that follow text without a blank line
//! 2. [`html`] — markdown → HTML fragment (pulldown-cmark) or text →
//!    escaped `<pre>`, then wrap in the fixed A4 print template
//! 3. [`pdf`] — render the composed HTML to PDF bytes; the only stage that
//!    touches the rendering backend

pub mod html;
pub mod pdf;
pub mod preprocess;
