//! Plain-text rendition of an OCR result.
//!
//! The Markdown strip is deliberately naive: every literal `#` and `*` is
//! removed and nothing else is interpreted. Links, tables, and emphasis
//! survive as-is. Anything smarter would need a real Markdown parser for
//! marginal gain — this output exists for grepping and piping, not reading.

use crate::api::OcrResponse;

/// Format the OCR result as plain text. Images are never included.
///
/// A result with `error` set renders as the single line `"Error: {error}"`;
/// a result without pages as `"No content found in document."`.
pub fn to_text(result: &OcrResponse) -> String {
    if let Some(ref error) = result.error {
        return format!("Error: {error}");
    }
    if result.pages.is_empty() {
        return super::markdown::NO_CONTENT.to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    for page in &result.pages {
        parts.push(format!("--- Page {} ---\n", u64::from(page.index) + 1));
        parts.push(page.markdown.replace(['#', '*'], ""));
        parts.push("\n\n".to_string());
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{OcrImage, OcrPage, OcrResponse};
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    #[test]
    fn error_and_empty_results_match_markdown_formatter() {
        assert_eq!(to_text(&OcrResponse::from_error("X")), "Error: X");
        assert_eq!(to_text(&OcrResponse::default()), "No content found in document.");
    }

    #[test]
    fn markdown_markers_are_stripped() {
        let result = OcrResponse {
            error: None,
            pages: vec![OcrPage {
                index: 0,
                markdown: "# Heading\nSome *text* with **bold**.".to_string(),
                images: Vec::new(),
            }],
        };
        let out = to_text(&result);
        assert!(out.contains("--- Page 1 ---"));
        assert!(out.contains(" Heading"));
        assert!(out.contains("Some text with bold."));
        assert!(!out.contains('#'));
        assert!(!out.contains('*'));
    }

    #[test]
    fn images_never_appear() {
        let result = OcrResponse {
            error: None,
            pages: vec![OcrPage {
                index: 2,
                markdown: "content".to_string(),
                images: vec![OcrImage {
                    id: Some("img".into()),
                    image_base64: Some(STANDARD.encode(b"data")),
                }],
            }],
        };
        let out = to_text(&result);
        assert!(out.contains("--- Page 3 ---"));
        assert!(!out.contains("!["));
        assert!(!out.contains("base64"));
    }

    #[test]
    fn page_label_survives_max_index() {
        let result = OcrResponse {
            error: None,
            pages: vec![OcrPage {
                index: u32::MAX,
                markdown: "content".to_string(),
                images: Vec::new(),
            }],
        };
        assert!(to_text(&result).contains("--- Page 4294967296 ---"));
    }
}
