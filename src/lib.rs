//! PDF Batch MCP Library
//!
//! Fetches attachments by subject line and runs batch operations over the PDFs:
//! - merge every PDF into `Combined_documents.pdf`
//! - copy pages containing a keyword into `<name>_keyword_pages.pdf`
//! - count occurrences of a word per PDF
//!
//! The operations are available as a library ([`PdfBatchProcessor`]), as a
//! one-shot batch ([`run_batch`]) and as MCP tools ([`PdfBatchServer`]).

pub mod batch;
pub mod config;
pub mod error;
pub mod pdf;
pub mod processor;
pub mod server;
pub mod source;

pub use batch::{run_batch, BatchReport, DocumentSummary, MergeSummary};
pub use config::{BatchConfig, ServerConfig};
pub use error::{Error, Result};
pub use processor::{
    DocumentResult, KeywordReport, MergeReport, PdfBatchProcessor, WordCount,
    KEYWORD_PAGES_SUFFIX, MERGED_FILE_NAME,
};
pub use server::{run_server, run_server_with_config, PdfBatchServer};
pub use source::{AttachmentSource, FixedPaths, MailDropSource};
