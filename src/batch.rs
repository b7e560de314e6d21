//! Fetch-then-process workflow driven by a [`BatchConfig`]

use crate::config::BatchConfig;
use crate::error::Result;
use crate::pdf::PageTextExtractor;
use crate::processor::{
    DocumentResult, KeywordReport, MergeReport, PdfBatchProcessor, WordCount,
};
use crate::source::AttachmentSource;
use schemars::JsonSchema;
use serde::Serialize;

/// Result of one operation on one document, ready for serialization.
/// Errors carry [`Error::client_message`](crate::Error::client_message); the full
/// error is logged where it happens.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DocumentSummary<T> {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<DocumentResult<T>> for DocumentSummary<T> {
    fn from(result: DocumentResult<T>) -> Self {
        let path = result.path.display().to_string();
        match result.outcome {
            Ok(report) => Self {
                path,
                report: Some(report),
                error: None,
            },
            Err(e) => Self {
                path,
                report: None,
                error: Some(e.client_message()),
            },
        }
    }
}

/// Merge outcome within a batch
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MergeSummary {
    /// Absent when there was nothing to merge or the merge failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<MergeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a batch run did
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BatchReport {
    /// RFC 3339 start time
    pub started_at: String,
    pub subject: String,
    pub output_dir: String,
    /// Files the attachment source saved
    pub attachments: Vec<String>,
    /// PDFs among them, in processing order
    pub documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_pages: Option<Vec<DocumentSummary<KeywordReport>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_frequency: Option<Vec<DocumentSummary<WordCount>>>,
}

/// Fetch attachments for `config.subject` and run the enabled operations.
///
/// Operations run in a fixed order: merge, keyword extraction, word frequency.
/// A failing operation is recorded in the report and does not stop the next one.
/// Only a failing attachment source or an invalid configuration is an `Err`.
pub fn run_batch<S, E>(config: &BatchConfig, source: &S, extractor: E) -> Result<BatchReport>
where
    S: AttachmentSource + ?Sized,
    E: PageTextExtractor,
{
    config.validate()?;

    let started_at = chrono::Utc::now().to_rfc3339();
    let output_dir = config.output_path();

    let attachments = source.fetch(&config.subject, &output_dir, config.pdfs_only)?;

    let mut report = BatchReport {
        started_at,
        subject: config.subject.clone(),
        output_dir: output_dir.display().to_string(),
        attachments: attachments
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        documents: Vec::new(),
        merge: None,
        keyword_pages: None,
        word_frequency: None,
    };

    if attachments.is_empty() {
        tracing::info!(subject = %config.subject, "No attachments found");
        return Ok(report);
    }

    std::fs::create_dir_all(&output_dir)?;

    let processor = PdfBatchProcessor::with_extractor(attachments, &output_dir, extractor);
    report.documents = processor
        .documents()
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    if config.merge {
        report.merge = Some(match processor.merge() {
            Ok(merged) => MergeSummary {
                report: merged,
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Error combining PDFs");
                MergeSummary {
                    report: None,
                    error: Some(e.client_message()),
                }
            }
        });
    }

    if let Some(keyword) = &config.extract_keyword {
        let results = processor.extract_pages_by_keyword(keyword);
        report.keyword_pages = Some(results.into_iter().map(DocumentSummary::from).collect());
    }

    if let Some(word) = &config.word_frequency {
        let results = processor.word_frequency(word)?;
        report.word_frequency = Some(results.into_iter().map(DocumentSummary::from).collect());
    }

    Ok(report)
}
