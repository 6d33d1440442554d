//! PDF rendition of an OCR result: a paginated A4 report via printpdf.
//!
//! This formatter is stricter than the other two — it refuses outright to
//! render a service error or an empty result, because an "Error: …" PDF is
//! worse than no file at all.
//!
//! ## The heading heuristic
//!
//! Page content is split on blank lines into blocks; a block starting with
//! `#` characters becomes a heading whose level is the count of leading
//! `#`s (level 1 and 2 get distinct styles, 3 and deeper collapse into one
//! sub-heading style). This is an intentionally shallow parser — no lists,
//! no emphasis, no tables. Keeping it a pure leading-`#` count keeps the
//! output stable and byte-for-byte comparable between runs; a real
//! Markdown parser would reflow text differently with every upgrade.
//!
//! Layout is classic cursor-from-the-top: a `y` position in millimetres
//! walks down the page, and anything that will not fit above the bottom
//! margin triggers a page break. Built-in Helvetica keeps the binary free
//! of font assets; line wrapping uses an average-glyph-width estimate,
//! which is all a report of OCR text needs.

use crate::api::OcrResponse;
use crate::error::OcrError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, warn};

// A4 portrait with uniform margins.
const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 20.0;
const TEXT_WIDTH_MM: f64 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

// Point-to-millimetre and Helvetica width/leading estimates.
const PT_TO_MM: f64 = 0.352_778;
const AVG_CHAR_WIDTH_FRACTION: f64 = 0.5;
const LINE_SPACING: f64 = 1.3;

// Inline images are scaled down (never up) to fit this box.
const IMAGE_MAX_WIDTH_MM: f64 = 170.0;
const IMAGE_MAX_HEIGHT_MM: f64 = 120.0;
const IMAGE_DPI: f64 = 300.0;

// Vertical gap between one source page's content and the next.
const PAGE_SPACER_MM: f64 = 10.0;

const PAGE_HEADING_PT: f64 = 16.0;
const H1_PT: f64 = 18.0;
const H2_PT: f64 = 14.0;
const SUBHEADING_PT: f64 = 12.0;
const BODY_PT: f64 = 11.0;
const CAPTION_PT: f64 = 9.0;

/// Render the OCR result as a paginated PDF report at `output_path`.
///
/// The document is laid out fully in memory and written once at the end;
/// per-image failures (bad base64, undecodable raster data) are replaced
/// with an italic error line and do not abort the report.
///
/// # Errors
/// * [`OcrError::PdfFormat`] — the result carries a service error or has
///   no pages; no file is created.
/// * [`OcrError::OutputWriteFailed`] / [`OcrError::PdfRender`] — the final
///   write failed.
pub fn to_pdf(result: &OcrResponse, output_path: &Path, include_images: bool) -> Result<(), OcrError> {
    if let Some(ref error) = result.error {
        return Err(OcrError::PdfFormat {
            reason: format!("OCR failed: {error}"),
        });
    }
    if result.pages.is_empty() {
        return Err(OcrError::PdfFormat {
            reason: "no content found in document".to_string(),
        });
    }

    let mut report = ReportWriter::new("OCR Results")?;

    for (n, page) in result.pages.iter().enumerate() {
        let page_label = u64::from(page.index) + 1;
        report.write_line(&format!("Page {page_label}"), PAGE_HEADING_PT, Style::Bold);

        for block in blocks(&page.markdown) {
            match heading_level(block) {
                0 => report.write_wrapped(block, BODY_PT, Style::Regular),
                1 => report.write_wrapped(strip_heading(block), H1_PT, Style::Bold),
                2 => report.write_wrapped(strip_heading(block), H2_PT, Style::Bold),
                _ => report.write_wrapped(strip_heading(block), SUBHEADING_PT, Style::Bold),
            }
        }

        if include_images {
            for (i, img) in page.images.iter().enumerate() {
                let Some(ref data) = img.image_base64 else {
                    continue;
                };
                let caption = format!("Image {} from page {page_label}", i + 1);
                match decode_image(data) {
                    Ok(decoded) => {
                        report.place_image(decoded);
                        report.write_line(&caption, CAPTION_PT, Style::Italic);
                    }
                    Err(e) => {
                        warn!("Skipping image {} on page {page_label}: {e}", i + 1);
                        report.write_line(
                            &format!("[{caption} could not be rendered: {e}]"),
                            CAPTION_PT,
                            Style::Italic,
                        );
                    }
                }
            }
        }

        if n + 1 < result.pages.len() {
            report.space(PAGE_SPACER_MM);
        }
    }

    report.finish(output_path)
}

// ── Block helpers ────────────────────────────────────────────────────────

/// Split page content on blank-line boundaries, dropping empty blocks.
fn blocks(content: &str) -> Vec<&str> {
    content
        .split("\n\n")
        .map(|b| b.trim_matches(['\r', '\n', ' ', '\t']))
        .filter(|b| !b.is_empty())
        .collect()
}

/// Count leading `#` characters; 0 means a body paragraph.
fn heading_level(block: &str) -> usize {
    block.chars().take_while(|&c| c == '#').count()
}

fn strip_heading(block: &str) -> &str {
    block.trim_start_matches('#').trim_start()
}

/// Greedy word wrap to a character budget. A word longer than the budget
/// gets its own overlong line rather than being split mid-word.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.len() + 1 + word.len() <= max_chars {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn decode_image(data: &str) -> Result<printpdf::image_crate::DynamicImage, String> {
    let bytes = STANDARD.decode(data).map_err(|e| e.to_string())?;
    printpdf::image_crate::load_from_memory(&bytes).map_err(|e| e.to_string())
}

// ── Cursor-based page writer ─────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Style {
    Regular,
    Bold,
    Italic,
}

struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    /// Cursor position, millimetres above the page bottom.
    y: f64,
}

fn mm(v: f64) -> Mm {
    Mm(v as _)
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self, OcrError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), "content");
        let layer = doc.get_page(page).get_layer(layer);

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| OcrError::PdfRender {
                reason: e.to_string(),
            })?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| OcrError::PdfRender {
                reason: e.to_string(),
            })?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| OcrError::PdfRender {
                reason: e.to_string(),
            })?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            italic,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    fn font(&self, style: Style) -> &IndirectFontRef {
        match style {
            Style::Regular => &self.regular,
            Style::Bold => &self.bold,
            Style::Italic => &self.italic,
        }
    }

    /// Break to a fresh page unless `height_mm` fits above the margin.
    fn ensure_room(&mut self, height_mm: f64) {
        if self.y - height_mm < MARGIN_MM {
            let (page, layer) =
                self.doc
                    .add_page(mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    /// Write one pre-wrapped line and advance the cursor.
    fn write_line(&mut self, text: &str, size_pt: f64, style: Style) {
        let line_height = size_pt * PT_TO_MM * LINE_SPACING;
        self.ensure_room(line_height);
        self.y -= line_height;
        self.layer
            .use_text(text, size_pt as _, mm(MARGIN_MM), mm(self.y), self.font(style));
    }

    /// Word-wrap a block to the text width and write it, with a small
    /// trailing gap separating it from the next block.
    fn write_wrapped(&mut self, text: &str, size_pt: f64, style: Style) {
        let char_width_mm = size_pt * AVG_CHAR_WIDTH_FRACTION * PT_TO_MM;
        let max_chars = (TEXT_WIDTH_MM / char_width_mm).max(1.0) as usize;

        for line in wrap_words(text, max_chars) {
            self.write_line(&line, size_pt, style);
        }
        self.space(size_pt * PT_TO_MM * 0.5);
    }

    /// Advance the cursor without drawing. Never forces a page break — a
    /// spacer at the bottom of a page just disappears.
    fn space(&mut self, height_mm: f64) {
        self.y = (self.y - height_mm).max(MARGIN_MM);
    }

    /// Place an image scaled to fit the fixed bounds, aspect preserved.
    fn place_image(&mut self, decoded: printpdf::image_crate::DynamicImage) {
        let image = Image::from_dynamic_image(&decoded);
        let natural_w = image.image.width.0 as f64 * 25.4 / IMAGE_DPI;
        let natural_h = image.image.height.0 as f64 * 25.4 / IMAGE_DPI;

        let scale = (IMAGE_MAX_WIDTH_MM / natural_w)
            .min(IMAGE_MAX_HEIGHT_MM / natural_h)
            .min(1.0);
        let display_h = natural_h * scale;

        self.ensure_room(display_h + CAPTION_PT * PT_TO_MM * LINE_SPACING);
        self.y -= display_h;
        debug!(
            "Placing image {}x{}px at scale {scale:.3}",
            image.image.width.0, image.image.height.0
        );

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(MARGIN_MM)),
                translate_y: Some(mm(self.y)),
                scale_x: Some(scale as _),
                scale_y: Some(scale as _),
                dpi: Some(IMAGE_DPI as _),
                ..Default::default()
            },
        );
        self.space(2.0);
    }

    /// Serialise the whole document to `output_path` in one write.
    fn finish(self, output_path: &Path) -> Result<(), OcrError> {
        let file = File::create(output_path).map_err(|e| OcrError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| OcrError::PdfRender {
                reason: e.to_string(),
            })?;
        debug!("PDF report written to {}", output_path.display());
        Ok(())
    }
}
