//! qpdf FFI wrapper for page-level PDF assembly
//!
//! Merging and page copying go through the qpdf crate (vendored FFI). Pages are
//! copied as foreign objects, so their content streams, resources and annotations
//! are carried over as-is rather than re-rendered.

use crate::error::{Error, Result};
use qpdf::QPdf;

/// Wrapper for qpdf operations via FFI
pub struct QpdfWrapper;

/// A document handed to qpdf: its display name (used in errors) and raw bytes
#[derive(Debug, Clone, Copy)]
pub struct PdfInput<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
}

/// Open a QPdf from memory, attributing failures to the named document
fn open_qpdf(input: &PdfInput<'_>) -> Result<QPdf> {
    QPdf::read_from_memory(input.data).map_err(|e| Error::DocumentOpen {
        path: input.name.to_string(),
        reason: e.to_string(),
    })
}

/// Map qpdf crate errors that are not tied to one input document
fn map_qpdf_error(e: qpdf::QPdfError) -> Error {
    Error::QpdfError {
        reason: e.to_string(),
    }
}

impl QpdfWrapper {
    /// Merge multiple PDFs into one, in input order
    ///
    /// Every page of every input is appended. The first input that cannot be
    /// opened or whose pages cannot be appended aborts the whole merge.
    ///
    /// # Returns
    /// The merged PDF as bytes
    pub fn merge(inputs: &[PdfInput<'_>]) -> Result<Vec<u8>> {
        if inputs.is_empty() {
            return Err(Error::EmptyInputSet);
        }

        let dest = QPdf::empty();
        // Foreign stream data is only pulled in when dest is written.
        let mut sources = Vec::with_capacity(inputs.len());

        for input in inputs {
            let source = open_qpdf(input)?;

            let pages = source.get_pages().map_err(|e| Error::DocumentOpen {
                path: input.name.to_string(),
                reason: format!("Failed to get pages: {}", e),
            })?;

            for page in &pages {
                let copied = dest.copy_from_foreign(page);
                dest.add_page(&copied, false).map_err(|e| Error::QpdfError {
                    reason: format!("Failed to append page from {}: {}", input.name, e),
                })?;
            }

            tracing::debug!(document = input.name, pages = pages.len(), "appended pages");
            sources.push(source);
        }

        let output = dest.writer().write_to_memory().map_err(map_qpdf_error)?;
        drop(sources);
        Ok(output)
    }

    /// Copy selected pages of a PDF into a new document
    ///
    /// # Arguments
    /// * `input` - The source document
    /// * `indices` - 0-indexed pages to keep, in output order
    ///
    /// # Returns
    /// The new PDF in bytes
    pub fn select_pages(input: &PdfInput<'_>, indices: &[u32]) -> Result<Vec<u8>> {
        let source = open_qpdf(input)?;
        let num_pages = source.get_num_pages().map_err(map_qpdf_error)?;

        let dest = QPdf::empty();

        for &idx in indices {
            let page = source.get_page(idx).ok_or_else(|| Error::QpdfError {
                reason: format!(
                    "Page {} out of bounds in {} (total: {})",
                    idx + 1,
                    input.name,
                    num_pages
                ),
            })?;
            let copied = dest.copy_from_foreign(&page);
            dest.add_page(&copied, false).map_err(map_qpdf_error)?;
        }

        let mut writer = dest.writer();
        writer.preserve_encryption(false);
        writer.write_to_memory().map_err(map_qpdf_error)
    }

    /// Get the page count of a PDF
    pub fn get_page_count(input: &PdfInput<'_>) -> Result<u32> {
        let qpdf = open_qpdf(input)?;
        qpdf.get_num_pages().map_err(map_qpdf_error)
    }
}
