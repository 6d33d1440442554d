//! # mistocr
//!
//! OCR PDF documents and slide decks with the Mistral AI OCR API, and turn
//! the structured per-page results into Markdown, plain text, or a
//! generated PDF report.
//!
//! ## Why this crate?
//!
//! Scanned documents and image-heavy slide decks defeat local text
//! extraction. The Mistral OCR endpoint reads them server-side and returns
//! Markdown per page, with the embedded images as base64 when asked. This
//! crate is the orchestration around that single remote call: credential
//! lookup, page selection, the upload-then-OCR round trip, and the
//! formatting of the response.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document (.pdf / .pptx)
//!  │
//!  ├─ 1. Validate    extension + existence check, parse --pages
//!  ├─ 2. Credential  MISTRAL_API_KEY → keyring → one-time prompt
//!  ├─ 3. Remote OCR  upload to /v1/files, then POST /v1/ocr
//!  └─ 4. Format      Markdown | plain text | PDF report
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mistocr::{parse_pages, to_markdown, OcrClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OcrClient::new(std::env::var("MISTRAL_API_KEY")?);
//!     let pages = parse_pages(Some("0,2-4"))?;
//!     let result = client
//!         .process("scan.pdf".as_ref(), pages.as_deref(), true)
//!         .await?;
//!     println!("{}", to_markdown(&result, true, None));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mistocr` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mistocr = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod pages;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use api::{OcrClient, OcrImage, OcrPage, OcrResponse};
pub use config::{ensure_api_key, get_api_key, store_api_key};
pub use error::OcrError;
pub use format::{to_markdown, to_pdf, to_text, OutputFormat};
pub use input::validate_input;
pub use pages::parse_pages;
