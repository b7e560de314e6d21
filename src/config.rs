//! Batch and server configuration

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the mail drop root
pub const MAIL_DROP_ENV: &str = "PDF_BATCH_MAIL_DROP";

fn default_output_dir() -> String {
    "attachments".to_string()
}

/// One batch run: which attachments to fetch and what to do with them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchConfig {
    /// Exact subject line of the messages whose attachments are fetched
    pub subject: String,
    /// Directory receiving attachments and generated PDFs (default: "attachments")
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Fetch only attachments whose names end in ".pdf" (default: false)
    #[serde(default)]
    pub pdfs_only: bool,
    /// Merge all PDFs into Combined_documents.pdf (default: false)
    #[serde(default)]
    pub merge: bool,
    /// Copy pages containing this keyword into <name>_keyword_pages.pdf
    #[serde(default)]
    pub extract_keyword: Option<String>,
    /// Count occurrences of this word in each PDF
    #[serde(default)]
    pub word_frequency: Option<String>,
}

impl BatchConfig {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            output_dir: default_output_dir(),
            pdfs_only: false,
            merge: false,
            extract_keyword: None,
            word_frequency: None,
        }
    }

    /// Load a batch configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no run could satisfy
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(Error::Config {
                reason: "subject must not be empty".to_string(),
            });
        }
        if self.output_dir.trim().is_empty() {
            return Err(Error::Config {
                reason: "output_dir must not be empty".to_string(),
            });
        }
        if matches!(self.word_frequency.as_deref(), Some("")) {
            return Err(Error::InvalidSearchTerm {
                reason: "word must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}

/// Configuration for the MCP server
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Root of the mail drop used by fetch_attachments and run_batch
    pub mail_drop_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Build from the environment (`PDF_BATCH_MAIL_DROP`)
    pub fn from_env() -> Self {
        Self {
            mail_drop_dir: std::env::var_os(MAIL_DROP_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}
