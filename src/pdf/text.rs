//! Per-page text extraction
//!
//! The batch processor only needs "the text of page N, if any". That capability is
//! the [`PageTextExtractor`] trait; [`PdfiumExtractor`] is the production
//! implementation backed by PDFium.

use crate::error::{Error, Result};
use pdfium_render::prelude::*;
use std::path::Path;

/// Vertical distance within which characters are treated as one line
const Y_TOLERANCE: f32 = 5.0;

/// Horizontal gap above which a space is inserted between characters
const SPACE_THRESHOLD: f32 = 10.0;

/// Source of plain text for each page of a document.
///
/// Implementations return one entry per page, in page order. `None` means the
/// page yielded no text (image-only pages, or a page whose text layer could not
/// be read); it is never an error by itself. An `Err` means the document as a
/// whole could not be processed.
pub trait PageTextExtractor {
    fn page_texts(&self, path: &Path, data: &[u8]) -> Result<Vec<Option<String>>>;
}

/// Text extractor using PDFium
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumExtractor;

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to a library next to the binary, then the usual install path
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Whether a PDFium library can be bound in this environment
pub fn pdfium_available() -> bool {
    create_pdfium().is_ok()
}

impl PageTextExtractor for PdfiumExtractor {
    fn page_texts(&self, path: &Path, data: &[u8]) -> Result<Vec<Option<String>>> {
        let name = path.display().to_string();
        let pdfium = create_pdfium()?;

        let document =
            pdfium
                .load_pdf_from_byte_slice(data, None)
                .map_err(|e| Error::DocumentOpen {
                    path: name.clone(),
                    reason: format!("{}", e),
                })?;

        let pages = document.pages();
        let mut texts = Vec::with_capacity(pages.len() as usize);

        for index in 0..pages.len() {
            let page = pages.get(index).map_err(|e| Error::TextExtraction {
                path: name.clone(),
                reason: format!("Failed to get page {}: {}", index + 1, e),
            })?;

            let text = page_text_with_layout(&page);
            if text.is_none() {
                tracing::debug!(document = %name, page = index, "page has no extractable text");
            }
            texts.push(text);
        }

        Ok(texts)
    }
}

/// Extract text from a page in reading order, or `None` when it has no text layer
fn page_text_with_layout(page: &PdfPage) -> Option<String> {
    let text_obj = page.text().ok()?;

    let mut chars_with_pos: Vec<(char, f32, f32)> = Vec::new();
    for segment in text_obj.segments().iter() {
        if let Ok(chars) = segment.chars() {
            for char_result in chars.iter() {
                if let Some(c) = char_result.unicode_char() {
                    if let Ok(bounds) = char_result.loose_bounds() {
                        chars_with_pos.push((c, bounds.left().value, bounds.top().value));
                    }
                }
            }
        }
    }

    let text = layout_text(chars_with_pos);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Lay out positioned characters as text.
///
/// Characters are grouped into lines by Y coordinate (top to bottom), each line
/// is ordered left to right, and a space is inserted wherever the horizontal gap
/// between neighbours exceeds [`SPACE_THRESHOLD`].
pub(crate) fn layout_text(mut chars: Vec<(char, f32, f32)>) -> String {
    if chars.is_empty() {
        return String::new();
    }

    // Y descending (PDF origin is bottom-left), then X ascending
    chars.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<(char, f32)>> = Vec::new();
    let mut current_line: Vec<(char, f32)> = Vec::new();
    let mut current_y: Option<f32> = None;

    for (c, x, y) in chars {
        match current_y {
            Some(cur_y) if (cur_y - y).abs() <= Y_TOLERANCE => current_line.push((c, x)),
            _ => {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                }
                current_line.push((c, x));
                current_y = Some(y);
            }
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }

    let mut result = String::new();
    for mut line in lines {
        line.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut prev_x: Option<f32> = None;
        for (c, x) in line {
            if let Some(px) = prev_x {
                if x - px > SPACE_THRESHOLD && c != ' ' {
                    result.push(' ');
                }
            }
            result.push(c);
            prev_x = Some(x);
        }
        result.push('\n');
    }

    result.trim_end().to_string()
}
