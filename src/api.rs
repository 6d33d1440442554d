//! Remote OCR client: upload a document, then ask the service to OCR it.
//!
//! The API is a two-step sequence — `POST /v1/files` with the raw document
//! returns an id, and `POST /v1/ocr` with that id returns per-page results.
//! It is plain sequential dependency, not a protocol: one function, two
//! internal steps, one failure funnel.
//!
//! ## The failure funnel
//!
//! Everything that goes wrong *after* a successful upload (transport error,
//! non-2xx status, unparseable body) is encoded into
//! [`OcrResponse::error`] rather than returned as `Err`. The formatters all
//! know how to render that field, so the user sees the service's own words
//! regardless of output format. Only a failed upload escalates as
//! [`OcrError::UploadFailed`] — without a document id there is nothing to
//! format at all.

use crate::error::OcrError;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// OCR endpoint of the Mistral API.
pub const MISTRAL_OCR_URL: &str = "https://api.mistral.ai/v1/ocr";
/// File-upload endpoint of the Mistral API.
pub const MISTRAL_FILES_URL: &str = "https://api.mistral.ai/v1/files";
/// Model the OCR request names.
pub const DEFAULT_MODEL: &str = "mistral-large-pdf";

// ── Wire types ───────────────────────────────────────────────────────────

/// Result structure returned by the OCR service.
///
/// When `error` is set the call failed and `pages` is meaningless; the
/// formatters check it first. An empty `pages` with no error means the
/// document genuinely had no recognisable content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResponse {
    /// Set when the service (or the transport) reported a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Per-page OCR results, in the order the service returned them.
    #[serde(default)]
    pub pages: Vec<OcrPage>,
}

impl OcrResponse {
    /// Wrap a failure message the way the service itself reports one.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            pages: Vec::new(),
        }
    }
}

/// One page of OCR output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrPage {
    /// Zero-based position in the source document. Display label only —
    /// the service is trusted to honour the requested page list, so this
    /// is never cross-checked against it.
    #[serde(default)]
    pub index: u32,

    /// Markdown-flavoured text recognised on the page.
    #[serde(default)]
    pub markdown: String,

    /// Images embedded in the page, if any were requested and found.
    #[serde(default)]
    pub images: Vec<OcrImage>,
}

/// One image extracted from a page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrImage {
    /// Service-assigned identifier; informational only.
    #[serde(default)]
    pub id: Option<String>,

    /// Base64-encoded raster data. Absent when the service could not
    /// embed the image.
    #[serde(default)]
    pub image_base64: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    id: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────

/// HTTP client for the Mistral OCR API.
pub struct OcrClient {
    http: reqwest::Client,
    api_key: String,
    ocr_url: String,
    files_url: String,
    model: String,
}

impl OcrClient {
    /// Create a client for the production endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            ocr_url: MISTRAL_OCR_URL.to_string(),
            files_url: MISTRAL_FILES_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override both endpoints, e.g. to point at a local test server.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.ocr_url = format!("{base}/v1/ocr");
        self.files_url = format!("{base}/v1/files");
        self
    }

    /// Override the model named in the OCR request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Upload a document and return its service-side id.
    ///
    /// # Errors
    /// [`OcrError::UploadFailed`] on any transport error, non-2xx status,
    /// or a response body without an `id`.
    pub async fn upload(&self, file_path: &Path) -> Result<String, OcrError> {
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| OcrError::UploadFailed {
                reason: format!("could not read '{}': {e}", file_path.display()),
            })?;

        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        debug!("Uploading {} ({} bytes)", filename, bytes.len());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));

        let response = self
            .http
            .post(&self.files_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| OcrError::UploadFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::UploadFailed {
                reason: format!("HTTP {status}: {body}"),
            });
        }

        let upload: UploadResponse =
            response.json().await.map_err(|e| OcrError::UploadFailed {
                reason: format!("unexpected upload response: {e}"),
            })?;

        upload.id.ok_or_else(|| OcrError::UploadFailed {
            reason: "upload response carried no document id".to_string(),
        })
    }

    /// Upload `file_path` and run OCR on it.
    ///
    /// `pages` restricts processing to specific zero-based indices (`None`
    /// means all pages); `include_images` asks the service to return
    /// base64-embedded page images.
    ///
    /// Post-upload failures come back as an [`OcrResponse`] with `error`
    /// set, never as `Err`.
    ///
    /// # Errors
    /// Only [`OcrError::UploadFailed`], from the upload step.
    pub async fn process(
        &self,
        file_path: &Path,
        pages: Option<&[u32]>,
        include_images: bool,
    ) -> Result<OcrResponse, OcrError> {
        let file_id = self.upload(file_path).await?;
        info!("Uploaded document, id: {file_id}");

        let document_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let mut payload = serde_json::json!({
            "model": self.model,
            "document": {
                "type": "document_url",
                "document_url": file_id,
                "document_name": document_name,
            },
            "include_image_base64": include_images,
        });
        if let Some(pages) = pages {
            payload["pages"] = serde_json::json!(pages);
        }

        let response = match self
            .http
            .post(&self.ocr_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("OCR request failed: {e}");
                return Ok(OcrResponse::from_error(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OCR request returned HTTP {status}");
            return Ok(OcrResponse::from_error(format!("HTTP {status}: {body}")));
        }

        match response.json::<OcrResponse>().await {
            Ok(result) => {
                info!("OCR returned {} pages", result.pages.len());
                Ok(result)
            }
            Err(e) => Ok(OcrResponse::from_error(format!(
                "unexpected OCR response: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_deserialises_from_service_shape() {
        let json = r##"{
            "pages": [
                {
                    "index": 0,
                    "markdown": "# Heading\nSome *text*.",
                    "images": [
                        {"id": "img-0", "image_base64": "ZGF0YQ=="},
                        {"id": "img-1"}
                    ]
                },
                {"index": 3, "markdown": "Later page."}
            ]
        }"##;

        let result: OcrResponse = serde_json::from_str(json).unwrap();
        assert!(result.error.is_none());
        assert_eq!(result.pages.len(), 2);
        assert_eq!(result.pages[0].images.len(), 2);
        assert_eq!(
            result.pages[0].images[0].image_base64.as_deref(),
            Some("ZGF0YQ==")
        );
        assert!(result.pages[0].images[1].image_base64.is_none());
        // Indices pass through untouched, even when non-contiguous.
        assert_eq!(result.pages[1].index, 3);
    }

    #[test]
    fn error_body_deserialises() {
        let result: OcrResponse =
            serde_json::from_str(r#"{"error": "quota exhausted"}"#).unwrap();
        assert_eq!(result.error.as_deref(), Some("quota exhausted"));
        assert!(result.pages.is_empty());
    }

    #[test]
    fn from_error_has_no_pages() {
        let result = OcrResponse::from_error("boom");
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(result.pages.is_empty());
    }

    #[test]
    fn with_base_url_rewrites_both_endpoints() {
        let client = OcrClient::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(client.ocr_url, "http://localhost:8080/v1/ocr");
        assert_eq!(client.files_url, "http://localhost:8080/v1/files");
    }

    #[test]
    fn with_model_overrides_default() {
        let client = OcrClient::new("key").with_model("mistral-ocr-latest");
        assert_eq!(client.model, "mistral-ocr-latest");
        assert_eq!(OcrClient::new("key").model, DEFAULT_MODEL);
    }
}
