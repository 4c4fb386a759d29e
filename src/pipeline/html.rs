//! HTML composition: source content → styled, self-contained HTML document.
//!
//! Markdown is converted with pulldown-cmark (tables, footnotes and
//! strikethrough enabled; fenced code blocks come out as
//! `<pre><code class="language-…">`). Plain text is HTML-escaped and wrapped
//! verbatim in a `<pre>` block — a text file containing `<script>` must
//! render as those seven characters, not execute as markup.
//!
//! The fragment is then wrapped in a fixed print template: A4, 2.5 cm
//! margins, page-number footer, black-on-white scheme, justified body text,
//! monospace code on light gray, bordered tables with a shaded header row.
//! The stylesheet is deliberately a constant — output documents are meant to
//! look identical regardless of which driving adapter produced them.

use crate::model::SourceFormat;
use pulldown_cmark::{html, Options, Parser};

/// Fixed print stylesheet embedded in every document.
const DOCUMENT_CSS: &str = r#"
        @page {
            size: a4;
            margin: 2.5cm;
            @bottom-center { content: "Page " counter(page); }
        }
        body {
            font-family: 'Helvetica', sans-serif;
            font-size: 11pt;
            line-height: 1.5;
            color: #000000;
        }
        h1 {
            font-size: 22pt;
            color: #000000;
            border-bottom: 2px solid #000000;
            padding-bottom: 5px;
            margin-top: 20px;
            margin-bottom: 15px;
        }
        h2 {
            font-size: 16pt;
            color: #000000;
            margin-top: 18px;
            margin-bottom: 10px;
            font-weight: bold;
        }
        h3 {
            font-size: 14pt;
            color: #000000;
            font-weight: bold;
            margin-top: 15px;
            margin-bottom: 8px;
        }
        p {
            margin-bottom: 10px;
            text-align: justify;
        }
        code {
            background-color: #f5f5f5;
            font-family: 'Courier New', Courier, monospace;
            color: #000000;
        }
        pre {
            background-color: #f5f5f5;
            padding: 10px;
            border: 1px solid #cccccc;
            margin-bottom: 15px;
        }
        ul, ol {
            margin-top: 5px;
            margin-bottom: 10px;
            margin-left: 20px;
            padding-left: 10px;
        }
        li {
            margin-bottom: 5px;
            color: #000000;
            list-style-type: disc;
        }
        table {
            border: 1px solid #000000;
            width: 100%;
            border-collapse: collapse;
            margin-bottom: 15px;
        }
        th {
            background-color: #e0e0e0;
            font-weight: bold;
            padding: 8px;
            border: 1px solid #000000;
            color: #000000;
        }
        td {
            padding: 8px;
            border: 1px solid #000000;
            color: #000000;
        }
"#;

/// Convert source content to an HTML fragment according to its format.
///
/// Markdown callers are expected to run
/// [`crate::pipeline::preprocess::normalize_lists`] first.
pub fn content_to_fragment(content: &str, format: SourceFormat) -> String {
    match format {
        SourceFormat::Markdown => markdown_to_html(content),
        SourceFormat::Text => format!("<pre>{}</pre>", escape_html(content)),
    }
}

/// Markdown → HTML fragment with tables, footnotes and strikethrough.
fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    // HTML output tends to be ~1.5× the markdown source.
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Escape the three characters that would otherwise be parsed as markup.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap an HTML fragment in the full document template.
pub fn compose_document(fragment: &str) -> String {
    format!(
        "<html>\n<head>\n<meta charset=\"utf-8\"/>\n<style>{DOCUMENT_CSS}</style>\n</head>\n\
         <body>\n{fragment}\n</body>\n</html>\n"
    )
}
