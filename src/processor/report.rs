//! Per-operation reports

use crate::error::Result;
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a successful merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MergeReport {
    /// Number of documents whose pages were merged
    pub documents_merged: usize,
    /// Total pages in the merged document
    pub page_count: u32,
    /// Where the merged document was written
    pub output_path: String,
}

/// Keyword scan of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct KeywordReport {
    /// Matching pages (0-indexed), in document order
    pub matched_pages: Vec<u32>,
    /// Pages examined
    pub pages_scanned: usize,
    /// Output document, present only when at least one page matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

impl KeywordReport {
    pub fn match_count(&self) -> usize {
        self.matched_pages.len()
    }
}

/// Occurrence count for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct WordCount {
    pub count: usize,
    pub pages_scanned: usize,
}

/// Result of running an operation against a single document.
///
/// Operations that isolate failures per document return one of these for every
/// document in the working set, in working-set order.
#[derive(Debug)]
pub struct DocumentResult<T> {
    pub path: PathBuf,
    pub outcome: Result<T>,
}

impl<T> DocumentResult<T> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
