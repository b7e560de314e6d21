//! Error types for the PDF batch tool

use thiserror::Error;

/// Result type alias for the PDF batch tool
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the PDF batch tool
#[derive(Error, Debug)]
pub enum Error {
    /// A document could not be read or parsed
    #[error("Failed to open {path}: {reason}")]
    DocumentOpen { path: String, reason: String },

    /// Text could not be pulled out of a document
    #[error("Failed to extract text from {path}: {reason}")]
    TextExtraction { path: String, reason: String },

    /// An output document could not be written
    #[error("Failed to write {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No PDF documents left after filtering
    #[error("No PDF documents to process")]
    EmptyInputSet,

    /// Keyword or word rejected before processing
    #[error("Invalid search term: {reason}")]
    InvalidSearchTerm { reason: String },

    /// Attachment retrieval failed
    #[error("Attachment source error: {reason}")]
    AttachmentSource { reason: String },

    /// Configuration could not be loaded
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// qpdf error
    #[error("qpdf error: {reason}")]
    QpdfError { reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Return a sanitized error message safe to send to clients.
    /// Library details are omitted; the full error should be logged via tracing first.
    pub fn client_message(&self) -> String {
        match self {
            Error::DocumentOpen { path, .. } => format!("Failed to open {}", path),
            Error::TextExtraction { path, .. } => format!("Failed to extract text from {}", path),
            Error::OutputWrite { path, .. } => format!("Failed to write {}", path),
            Error::EmptyInputSet => "No PDF documents to process".to_string(),
            Error::InvalidSearchTerm { reason } => format!("Invalid search term: {}", reason),
            Error::AttachmentSource { .. } => "Failed to fetch attachments".to_string(),
            Error::Config { reason } => format!("Invalid configuration: {}", reason),
            Error::Pdfium { .. } => "PDF processing error".to_string(),
            Error::QpdfError { .. } => "PDF processing error".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
        }
    }
}
