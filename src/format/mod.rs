//! Output formatting: one OCR result, three renditions.
//!
//! Each submodule is one pure-ish transformation of an
//! [`crate::api::OcrResponse`]:
//!
//! 1. [`markdown`] — headings, verbatim page content, image links
//!    (externalised files or data URIs)
//! 2. [`text`]     — plain text with a naive Markdown strip, no images
//! 3. [`pdf`]      — a paginated A4 report via printpdf; the only formatter
//!    with file I/O as its contract
//!
//! The first two return a `String` and render a service-reported error as
//! `"Error: …"`; the PDF formatter is stricter and refuses to produce a
//! document at all in that case.

pub mod markdown;
pub mod pdf;
pub mod text;

pub use markdown::to_markdown;
pub use pdf::to_pdf;
pub use text::to_text;

use std::path::Path;

/// The output formats the tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Markdown to stdout or a file (default).
    Markdown,
    /// Plain text with Markdown markers stripped.
    Text,
    /// A generated PDF report (requires an output path).
    Pdf,
}

impl OutputFormat {
    /// Resolve the effective format from an explicit request and the
    /// output path.
    ///
    /// An explicit `-f/--format` always wins. When the format was left at
    /// its default, an output path ending in `.pdf` silently upgrades the
    /// format to [`OutputFormat::Pdf`]; everything else stays Markdown.
    pub fn infer(requested: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
        if let Some(format) = requested {
            return format;
        }
        match output.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => OutputFormat::Pdf,
            _ => OutputFormat::Markdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_format_wins() {
        let out = PathBuf::from("report.pdf");
        assert_eq!(
            OutputFormat::infer(Some(OutputFormat::Text), Some(&out)),
            OutputFormat::Text
        );
    }

    #[test]
    fn pdf_output_path_upgrades_default() {
        let out = PathBuf::from("report.pdf");
        assert_eq!(OutputFormat::infer(None, Some(&out)), OutputFormat::Pdf);
        let upper = PathBuf::from("REPORT.PDF");
        assert_eq!(OutputFormat::infer(None, Some(&upper)), OutputFormat::Pdf);
    }

    #[test]
    fn everything_else_defaults_to_markdown() {
        assert_eq!(OutputFormat::infer(None, None), OutputFormat::Markdown);
        let md = PathBuf::from("out.md");
        assert_eq!(OutputFormat::infer(None, Some(&md)), OutputFormat::Markdown);
    }
}
