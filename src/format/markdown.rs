//! Markdown rendition of an OCR result.
//!
//! Page content arrives from the service already in Markdown, so this
//! formatter's job is framing: a heading per page, the content verbatim, a
//! rule between pages, and the images. Images are either written to a
//! directory and linked by relative path, or inlined as `data:` URIs —
//! embedding keeps the output self-contained, externalising keeps it
//! readable in editors that choke on megabyte-long lines.
//!
//! A failed image write degrades to an inline `[Error saving image: …]`
//! marker; the rest of the document is still produced.

use crate::api::OcrResponse;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Shown when the result carries no pages at all.
pub(crate) const NO_CONTENT: &str = "No content found in document.";

/// Format the OCR result as Markdown.
///
/// `image_dir` externalises images: each one is decoded and written to
/// `image_dir/page_{page}_image_{i}.png` (directory created on demand) and
/// linked by a path relative to the current working directory. Without a
/// directory, images are embedded as base64 data URIs. Images the service
/// returned without data are skipped silently.
///
/// A result with `error` set renders as the single line `"Error: {error}"`.
pub fn to_markdown(result: &OcrResponse, include_images: bool, image_dir: Option<&Path>) -> String {
    if let Some(ref error) = result.error {
        return format!("Error: {error}");
    }
    if result.pages.is_empty() {
        return NO_CONTENT.to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    for page in &result.pages {
        let page_label = u64::from(page.index) + 1;
        parts.push(format!("## Page {page_label}\n"));
        parts.push(page.markdown.clone());

        if include_images {
            for (i, img) in page.images.iter().enumerate() {
                let Some(ref data) = img.image_base64 else {
                    continue;
                };

                match image_dir {
                    Some(dir) => match save_image(dir, page.index, i, data) {
                        Ok(path) => {
                            let link = relative_to_cwd(&path);
                            parts.push(format!(
                                "\n![Image {} from page {page_label}]({})\n",
                                i + 1,
                                link.display()
                            ));
                        }
                        Err(message) => {
                            warn!("Image write failed: {message}");
                            parts.push(format!("\n[Error saving image: {message}]\n"));
                        }
                    },
                    None => {
                        parts.push(format!(
                            "\n![Image {} from page {page_label}](data:image/png;base64,{data})\n",
                            i + 1,
                        ));
                    }
                }
            }
        }

        parts.push("\n---\n".to_string());
    }

    parts.join("\n")
}

/// Decode one base64 payload and write it under `dir`.
///
/// Returns the written path, or the failure as a display string for the
/// inline marker. Bad base64 and I/O failures are treated alike — both
/// mean "this image could not be saved".
fn save_image(dir: &Path, page_index: u32, image_index: usize, data: &str) -> Result<PathBuf, String> {
    let bytes = STANDARD.decode(data).map_err(|e| e.to_string())?;

    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    let path = dir.join(format!("page_{page_index}_image_{image_index}.png"));
    std::fs::write(&path, &bytes).map_err(|e| e.to_string())?;

    debug!("Saved image to {}", path.display());
    Ok(path)
}

/// Express `path` relative to the current working directory.
///
/// Walks up from the cwd with `..` components where needed, so paths
/// outside the cwd still come out relative. Falls back to the path as
/// given when no relative form exists (different drive, unreadable cwd).
fn relative_to_cwd(path: &Path) -> PathBuf {
    let Ok(cwd) = std::env::current_dir() else {
        return path.to_path_buf();
    };
    relative_path(path, &cwd).unwrap_or_else(|| path.to_path_buf())
}

fn relative_path(target: &Path, base: &Path) -> Option<PathBuf> {
    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();

    // A relative form only makes sense when both sides share a root.
    match (target.first(), base.first()) {
        (Some(a), Some(b)) if a != b => return None,
        _ => {}
    }

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for component in &target[common..] {
        rel.push(component);
    }
    Some(rel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{OcrImage, OcrPage};

    fn one_page(markdown: &str) -> OcrResponse {
        OcrResponse {
            error: None,
            pages: vec![OcrPage {
                index: 0,
                markdown: markdown.to_string(),
                images: Vec::new(),
            }],
        }
    }

    #[test]
    fn error_result_renders_as_single_line() {
        let result = OcrResponse::from_error("X");
        assert_eq!(to_markdown(&result, true, None), "Error: X");
    }

    #[test]
    fn empty_pages_render_placeholder() {
        let result = OcrResponse::default();
        assert_eq!(to_markdown(&result, true, None), NO_CONTENT);
    }

    #[test]
    fn page_heading_and_content_are_emitted() {
        let out = to_markdown(&one_page("# Heading\nSome *text*."), false, None);
        assert!(out.contains("## Page 1\n"));
        assert!(out.contains("# Heading\nSome *text*."));
        assert!(out.contains("\n---\n"));
    }

    #[test]
    fn page_label_survives_max_index() {
        let mut result = one_page("content");
        result.pages[0].index = u32::MAX;
        let out = to_markdown(&result, false, None);
        assert!(out.contains("## Page 4294967296\n"));
    }

    #[test]
    fn images_without_data_are_skipped() {
        let mut result = one_page("body");
        result.pages[0].images.push(OcrImage {
            id: Some("img-0".into()),
            image_base64: None,
        });
        let out = to_markdown(&result, true, None);
        assert!(!out.contains("!["));
    }

    #[test]
    fn images_are_ignored_when_not_requested() {
        let mut result = one_page("body");
        result.pages[0].images.push(OcrImage {
            id: None,
            image_base64: Some(STANDARD.encode(b"data")),
        });
        let out = to_markdown(&result, false, None);
        assert!(!out.contains("!["));
    }

    #[test]
    fn embedded_image_uses_data_uri() {
        let mut result = one_page("body");
        let encoded = STANDARD.encode(b"data");
        result.pages[0].images.push(OcrImage {
            id: None,
            image_base64: Some(encoded.clone()),
        });
        let out = to_markdown(&result, true, None);
        assert!(out.contains(&format!(
            "![Image 1 from page 1](data:image/png;base64,{encoded})"
        )));
    }

    #[test]
    fn failed_write_degrades_to_inline_marker() {
        let dir = tempfile::tempdir().unwrap();
        // A path under a regular file cannot be created as a directory.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let mut result = one_page("body");
        result.pages[0].images.push(OcrImage {
            id: None,
            image_base64: Some(STANDARD.encode(b"data")),
        });

        let out = to_markdown(&result, true, Some(&blocker.join("imgs")));
        assert!(out.contains("[Error saving image:"), "got: {out}");
        // The rest of the document is still there.
        assert!(out.contains("## Page 1"));
        assert!(out.contains("\n---\n"));
    }

    #[test]
    fn relative_path_walks_up_with_parent_components() {
        let rel = relative_path(Path::new("/a/b/imgs/x.png"), Path::new("/a/c")).unwrap();
        assert_eq!(rel, PathBuf::from("../b/imgs/x.png"));

        let below = relative_path(Path::new("/a/b/x.png"), Path::new("/a")).unwrap();
        assert_eq!(below, PathBuf::from("b/x.png"));
    }
}
