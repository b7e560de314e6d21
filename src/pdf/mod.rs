//! PDF processing layer
//!
//! This module provides page assembly with qpdf and text extraction with PDFium.

mod qpdf;
mod text;

pub use qpdf::{PdfInput, QpdfWrapper};
pub use text::{pdfium_available, PageTextExtractor, PdfiumExtractor};
