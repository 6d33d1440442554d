//! Input validation: check the document exists and is a type the OCR
//! service accepts before anything touches the network.
//!
//! The service itself rejects unsupported uploads, but only after the whole
//! file has been transferred — catching a `.docx` here saves the round trip
//! and gives a clearer message.

use crate::error::OcrError;
use std::path::Path;
use tracing::debug;

/// File extensions the OCR service accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "pptx"];

/// Validate that `path` exists and carries a supported extension.
///
/// Extension matching is case-insensitive (`report.PDF` is fine).
pub fn validate_input(path: &Path) -> Result<(), OcrError> {
    if !path.exists() {
        return Err(OcrError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(OcrError::UnsupportedExtension {
            path: path.to_path_buf(),
            ext: if ext.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{ext}")
            },
        });
    }

    debug!("Validated input document: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_is_rejected() {
        let err = validate_input(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, OcrError::FileNotFound { .. }));
    }

    #[test]
    fn supported_extensions_pass() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["doc.pdf", "deck.pptx", "upper.PDF"] {
            let path = dir.path().join(name);
            fs::write(&path, b"stub").unwrap();
            validate_input(&path).unwrap_or_else(|e| panic!("{name} rejected: {e}"));
        }
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["notes.txt", "sheet.docx", "noext"] {
            let path = dir.path().join(name);
            fs::write(&path, b"stub").unwrap();
            let err = validate_input(&path).unwrap_err();
            assert!(
                matches!(err, OcrError::UnsupportedExtension { .. }),
                "{name} should be rejected, got: {err}"
            );
        }
    }
}
