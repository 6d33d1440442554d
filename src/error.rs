//! Error types for the mistocr library.
//!
//! One fatal enum covers everything that aborts an invocation. Failures the
//! remote OCR service reports about its own work are deliberately *not* here:
//! the client funnels them into [`crate::api::OcrResponse::error`], and the
//! formatters render them as human-readable text. The single exception is a
//! failed upload (no document id means there is nothing to OCR), which is
//! escalated as [`OcrError::UploadFailed`].
//!
//! Image-level failures during formatting (a base64 blob that will not
//! decode, an image file that cannot be written) never reach this enum
//! either — they are recovered per image and rendered inline so one bad
//! image cannot take down the rest of the document.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mistocr library.
#[derive(Debug, Error)]
pub enum OcrError {
    // ── Credential errors ─────────────────────────────────────────────────
    /// No API key in the environment, the keyring, or from the prompt.
    #[error(
        "No Mistral API key available.\n\
         Set MISTRAL_API_KEY or re-run interactively to store one."
    )]
    MissingApiKey,

    /// The platform keyring rejected a read or write.
    #[error("Credential store error: {reason}")]
    CredentialStore { reason: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File does not exist: '{path}'\nCheck the path and try again.")]
    FileNotFound { path: PathBuf },

    /// The file exists but its extension is not one the OCR service accepts.
    #[error(
        "Unsupported file format: '{ext}' ({path})\n\
         Supported formats are: .pdf, .pptx"
    )]
    UnsupportedExtension { path: PathBuf, ext: String },

    /// Malformed `--pages` specification.
    #[error("Invalid page specification '{token}': {reason}")]
    InvalidPageRange { token: String, reason: String },

    // ── Remote errors ─────────────────────────────────────────────────────
    /// The file upload did not yield a document id; there is nothing to OCR.
    #[error("Failed to upload file: {reason}")]
    UploadFailed { reason: String },

    // ── Formatting errors ─────────────────────────────────────────────────
    /// The PDF formatter refuses to render an error or empty result.
    #[error("Cannot render PDF output: {reason}")]
    PdfFormat { reason: String },

    /// printpdf failed while laying out or serialising the report.
    #[error("PDF rendering failed: {reason}")]
    PdfRender { reason: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
