//! Attachment sources
//!
//! Anything that can hand the batch processor a list of local files: the
//! directory-backed [`MailDropSource`], or [`FixedPaths`] for callers that
//! already know their inputs.

pub mod mail_drop;

pub use mail_drop::MailDropSource;

use crate::error::Result;
use crate::processor::is_pdf_path;
use std::path::{Path, PathBuf};

/// Supplies attachment files for a subject line.
///
/// Implementations save each matching attachment into `output_dir` and return the
/// saved paths. No matches is an empty list, not an error. With `pdfs_only` set,
/// attachments whose names do not end in ".pdf" are skipped.
pub trait AttachmentSource {
    fn fetch(&self, subject: &str, output_dir: &Path, pdfs_only: bool) -> Result<Vec<PathBuf>>;
}

/// Attachment source returning a fixed list of paths, whatever the subject
#[derive(Debug, Clone, Default)]
pub struct FixedPaths(pub Vec<PathBuf>);

impl AttachmentSource for FixedPaths {
    fn fetch(&self, _subject: &str, _output_dir: &Path, pdfs_only: bool) -> Result<Vec<PathBuf>> {
        Ok(self
            .0
            .iter()
            .filter(|p| !pdfs_only || is_pdf_path(p))
            .cloned()
            .collect())
    }
}
