//! MCP Server implementation using rmcp

use crate::batch::{run_batch, BatchReport, DocumentSummary};
use crate::config::{BatchConfig, ServerConfig};
use crate::error::Error;
use crate::pdf::PdfiumExtractor;
use crate::processor::{KeywordReport, MergeReport, PdfBatchProcessor, WordCount};
use crate::source::{AttachmentSource, MailDropSource};
use anyhow::Result;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// PDF batch MCP Server
#[derive(Clone)]
pub struct PdfBatchServer {
    tool_router: ToolRouter<Self>,
    /// Server configuration
    config: Arc<ServerConfig>,
}

// ============================================================================
// Request/Response types for fetch_attachments
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FetchAttachmentsParams {
    /// Exact subject line of the messages to fetch attachments from
    pub subject: String,
    /// Directory to save attachments into (created if missing)
    pub output_dir: String,
    /// Only fetch attachments whose names end in ".pdf" (default: false)
    #[serde(default)]
    pub pdfs_only: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FetchAttachmentsResult {
    pub subject: String,
    /// Saved attachment paths
    pub files: Vec<String>,
    pub total_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Request/Response types for merge_pdfs
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MergePdfsParams {
    /// Files to merge, in order. Paths not ending in ".pdf" are ignored.
    pub paths: Vec<String>,
    /// Directory receiving Combined_documents.pdf (created if missing)
    pub output_dir: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct MergePdfsResult {
    /// PDFs that took part in the merge
    pub documents: Vec<String>,
    /// Absent when there was nothing to merge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<MergeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Request/Response types for extract_keyword_pages
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExtractKeywordPagesParams {
    /// Files to scan. Paths not ending in ".pdf" are ignored.
    pub paths: Vec<String>,
    /// Directory receiving <name>_keyword_pages.pdf files (created if missing)
    pub output_dir: String,
    /// Case-insensitive keyword. An empty keyword selects every page with text.
    pub keyword: String,
}

// ============================================================================
// Request/Response types for word_frequency
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WordFrequencyParams {
    /// Files to scan. Paths not ending in ".pdf" are ignored.
    pub paths: Vec<String>,
    /// Case-insensitive substring to count (must not be empty)
    pub word: String,
}

/// Per-document results shared by extract_keyword_pages and word_frequency
#[derive(Debug, Serialize, JsonSchema)]
pub struct DocumentBatchResult<T> {
    pub documents: Vec<DocumentSummary<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn to_json<T: Serialize>(result: T) -> String {
    let response = serde_json::json!({ "results": [result] });
    serde_json::to_string_pretty(&response).unwrap_or_default()
}

/// Run blocking PDF work off the async runtime
async fn blocking<T, F>(work: F) -> crate::error::Result<T>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Io(std::io::Error::other(format!("Task join error: {}", e))))?
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl PdfBatchServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new server with full configuration
    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
        }
    }

    /// Save attachments of messages with a given subject
    #[tool(
        description = "Save the attachments of every message with the given subject from the configured mail drop into output_dir. Optionally keep only PDF attachments."
    )]
    async fn fetch_attachments(
        &self,
        Parameters(params): Parameters<FetchAttachmentsParams>,
    ) -> String {
        let result = self
            .process_fetch_attachments(&params)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "fetch_attachments failed");
                FetchAttachmentsResult {
                    subject: params.subject.clone(),
                    files: vec![],
                    total_count: 0,
                    error: Some(e.client_message()),
                }
            });

        to_json(result)
    }

    /// Merge PDFs into Combined_documents.pdf
    #[tool(
        description = "Merge PDF files, in the given order, into Combined_documents.pdf inside output_dir. All pages of every PDF are kept in order. Fails as a whole if any PDF cannot be read."
    )]
    async fn merge_pdfs(&self, Parameters(params): Parameters<MergePdfsParams>) -> String {
        let result = self
            .process_merge_pdfs(&params)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "merge_pdfs failed");
                MergePdfsResult {
                    documents: vec![],
                    merged: None,
                    error: Some(e.client_message()),
                }
            });

        to_json(result)
    }

    /// Copy pages containing a keyword into per-document PDFs
    #[tool(
        description = "For each PDF, copy the pages whose text contains the keyword (case-insensitive) into <name>_keyword_pages.pdf inside output_dir. PDFs without matching pages produce no file. Each PDF is reported separately."
    )]
    async fn extract_keyword_pages(
        &self,
        Parameters(params): Parameters<ExtractKeywordPagesParams>,
    ) -> String {
        let result = self
            .process_extract_keyword_pages(&params)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "extract_keyword_pages failed");
                DocumentBatchResult {
                    documents: vec![],
                    error: Some(e.client_message()),
                }
            });

        to_json(result)
    }

    /// Count occurrences of a word in each PDF
    #[tool(
        description = "Count case-insensitive occurrences of a word in each PDF. Substrings count (\"cat\" is found in \"category\"). Each PDF is reported separately."
    )]
    async fn word_frequency(&self, Parameters(params): Parameters<WordFrequencyParams>) -> String {
        let result = self
            .process_word_frequency(&params)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "word_frequency failed");
                DocumentBatchResult {
                    documents: vec![],
                    error: Some(e.client_message()),
                }
            });

        to_json(result)
    }

    /// Fetch attachments and run the selected operations in one go
    #[tool(
        description = "Fetch attachments for a subject from the configured mail drop, then optionally merge them, extract keyword pages and count a word. Operations run in that order; a failing operation does not stop the next."
    )]
    async fn run_batch(&self, Parameters(config): Parameters<BatchConfig>) -> String {
        match self.process_run_batch(config).await {
            Ok(report) => to_json(report),
            Err(e) => {
                tracing::warn!(error = %e, "run_batch failed");
                to_json(serde_json::json!({ "error": e.client_message() }))
            }
        }
    }
}

impl PdfBatchServer {
    fn mail_drop(&self) -> crate::error::Result<MailDropSource> {
        self.config
            .mail_drop_dir
            .as_ref()
            .map(|dir| MailDropSource::new(dir.clone()))
            .ok_or_else(|| Error::AttachmentSource {
                reason: "no mail drop directory configured".to_string(),
            })
    }

    async fn process_fetch_attachments(
        &self,
        params: &FetchAttachmentsParams,
    ) -> crate::error::Result<FetchAttachmentsResult> {
        let source = self.mail_drop()?;
        let subject = params.subject.clone();
        let output_dir = PathBuf::from(&params.output_dir);
        let pdfs_only = params.pdfs_only;

        let saved =
            blocking(move || source.fetch(&subject, &output_dir, pdfs_only)).await?;

        let files: Vec<String> = saved.iter().map(|p| p.display().to_string()).collect();
        Ok(FetchAttachmentsResult {
            subject: params.subject.clone(),
            total_count: files.len() as u32,
            files,
            error: None,
        })
    }

    async fn process_merge_pdfs(
        &self,
        params: &MergePdfsParams,
    ) -> crate::error::Result<MergePdfsResult> {
        let paths = params.paths.clone();
        let output_dir = PathBuf::from(&params.output_dir);

        blocking(move || {
            let processor = PdfBatchProcessor::new(paths, output_dir);
            let documents = processor
                .documents()
                .iter()
                .map(|p| p.display().to_string())
                .collect();

            if !processor.documents().is_empty() {
                std::fs::create_dir_all(processor.output_dir())?;
            }
            let merged = processor.merge()?;

            Ok(MergePdfsResult {
                documents,
                merged,
                error: None,
            })
        })
        .await
    }

    async fn process_extract_keyword_pages(
        &self,
        params: &ExtractKeywordPagesParams,
    ) -> crate::error::Result<DocumentBatchResult<KeywordReport>> {
        let paths = params.paths.clone();
        let output_dir = PathBuf::from(&params.output_dir);
        let keyword = params.keyword.clone();

        blocking(move || {
            let processor = PdfBatchProcessor::new(paths, output_dir);
            if !processor.documents().is_empty() {
                std::fs::create_dir_all(processor.output_dir())?;
            }

            let documents = processor
                .extract_pages_by_keyword(&keyword)
                .into_iter()
                .map(DocumentSummary::from)
                .collect();

            Ok(DocumentBatchResult {
                documents,
                error: None,
            })
        })
        .await
    }

    async fn process_word_frequency(
        &self,
        params: &WordFrequencyParams,
    ) -> crate::error::Result<DocumentBatchResult<WordCount>> {
        let paths = params.paths.clone();
        let word = params.word.clone();

        blocking(move || {
            // Counting writes nothing, so the output directory is never used
            let processor = PdfBatchProcessor::new(paths, PathBuf::new());
            let documents = processor
                .word_frequency(&word)?
                .into_iter()
                .map(DocumentSummary::from)
                .collect();

            Ok(DocumentBatchResult {
                documents,
                error: None,
            })
        })
        .await
    }

    async fn process_run_batch(&self, config: BatchConfig) -> crate::error::Result<BatchReport> {
        let source = self.mail_drop()?;
        blocking(move || run_batch(&config, &source, PdfiumExtractor)).await
    }
}

impl Default for PdfBatchServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for PdfBatchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Fetches attachments by subject and runs batch PDF operations: merge, \
                 keyword-page extraction and word frequency."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server with configuration taken from the environment
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::from_env()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let server = PdfBatchServer::with_config(config);

    tracing::info!("PDF batch MCP server ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
