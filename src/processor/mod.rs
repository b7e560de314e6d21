//! Batch operations over a fixed set of PDF documents
//!
//! A [`PdfBatchProcessor`] is built from candidate paths; anything that does not
//! end in ".pdf" (any case) is dropped at construction and the remaining working
//! set never changes. Each operation re-reads its inputs from disk and keeps no
//! state between calls.
//!
//! - [`PdfBatchProcessor::merge`] is all-or-nothing.
//! - [`PdfBatchProcessor::extract_pages_by_keyword`] and
//!   [`PdfBatchProcessor::word_frequency`] report one [`DocumentResult`] per
//!   document, so one unreadable file does not hide the others.

mod matching;
mod report;

pub use matching::{contains_ignore_case, count_ignore_case, is_pdf_path, page_matches};
pub use report::{DocumentResult, KeywordReport, MergeReport, WordCount};

use crate::error::{Error, Result};
use crate::pdf::{PageTextExtractor, PdfInput, PdfiumExtractor, QpdfWrapper};
use std::path::{Path, PathBuf};

/// File name of the merged document inside the output directory
pub const MERGED_FILE_NAME: &str = "Combined_documents.pdf";

/// Appended to an input's base name to name its keyword-page document
pub const KEYWORD_PAGES_SUFFIX: &str = "_keyword_pages";

/// Batch PDF processor over a fixed working set
#[derive(Debug, Clone)]
pub struct PdfBatchProcessor<E = PdfiumExtractor> {
    documents: Vec<PathBuf>,
    output_dir: PathBuf,
    extractor: E,
}

impl PdfBatchProcessor<PdfiumExtractor> {
    /// Create a processor that extracts text with PDFium
    pub fn new<I, P>(paths: I, output_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_extractor(paths, output_dir, PdfiumExtractor)
    }
}

impl<E: PageTextExtractor> PdfBatchProcessor<E> {
    /// Create a processor with a custom text extractor
    pub fn with_extractor<I, P>(paths: I, output_dir: impl Into<PathBuf>, extractor: E) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let documents: Vec<PathBuf> = paths
            .into_iter()
            .map(Into::into)
            .filter(|p| is_pdf_path(p))
            .collect();

        Self {
            documents,
            output_dir: output_dir.into(),
            extractor,
        }
    }

    /// The working set, in input order
    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn merged_output_path(&self) -> PathBuf {
        self.output_dir.join(MERGED_FILE_NAME)
    }

    /// Output path for the keyword pages of `document`: `<base-name>_keyword_pages.pdf`
    pub fn keyword_output_path(&self, document: &Path) -> PathBuf {
        let stem = document
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.output_dir
            .join(format!("{}{}.pdf", stem, KEYWORD_PAGES_SUFFIX))
    }

    /// Merge every page of every document, in order, into `Combined_documents.pdf`.
    ///
    /// Returns `Ok(None)` when the working set is empty. Any document that cannot
    /// be read or appended fails the whole merge, and no merged file is left in
    /// the output directory.
    pub fn merge(&self) -> Result<Option<MergeReport>> {
        if self.documents.is_empty() {
            tracing::info!("No PDF documents to merge");
            return Ok(None);
        }

        let mut loaded = Vec::with_capacity(self.documents.len());
        for path in &self.documents {
            let data = load_document(path)?;
            loaded.push((path.display().to_string(), data));
        }

        let inputs: Vec<PdfInput<'_>> = loaded
            .iter()
            .map(|(name, data)| PdfInput {
                name: name.as_str(),
                data: data.as_slice(),
            })
            .collect();

        let merged = QpdfWrapper::merge(&inputs)?;
        let page_count = QpdfWrapper::get_page_count(&PdfInput {
            name: MERGED_FILE_NAME,
            data: &merged,
        })?;

        let output_path = self.merged_output_path();
        write_output(&output_path, &merged)?;

        tracing::info!(
            output = %output_path.display(),
            documents = inputs.len(),
            pages = page_count,
            "Combined PDFs saved"
        );

        Ok(Some(MergeReport {
            documents_merged: inputs.len(),
            page_count,
            output_path: output_path.display().to_string(),
        }))
    }

    /// Copy the pages mentioning `keyword` (case-insensitive) out of each document.
    ///
    /// Documents with at least one matching page get a
    /// `<base-name>_keyword_pages.pdf`; documents without matches get a report
    /// with no output path. An empty keyword matches every page that has text.
    pub fn extract_pages_by_keyword(&self, keyword: &str) -> Vec<DocumentResult<KeywordReport>> {
        if self.documents.is_empty() {
            tracing::info!("No PDF documents to search");
        }

        self.documents
            .iter()
            .map(|path| {
                let outcome = self.extract_document(path, keyword);
                if let Err(ref e) = outcome {
                    tracing::warn!(document = %path.display(), error = %e, "keyword extraction failed");
                }
                DocumentResult {
                    path: path.clone(),
                    outcome,
                }
            })
            .collect()
    }

    /// Count case-insensitive, non-overlapping occurrences of `word` in each document.
    ///
    /// An empty word is rejected before any document is read.
    pub fn word_frequency(&self, word: &str) -> Result<Vec<DocumentResult<WordCount>>> {
        if word.is_empty() {
            return Err(Error::InvalidSearchTerm {
                reason: "word must not be empty".to_string(),
            });
        }

        if self.documents.is_empty() {
            tracing::info!("No PDF documents to count in");
        }

        Ok(self
            .documents
            .iter()
            .map(|path| {
                let outcome = self.count_in_document(path, word);
                match outcome {
                    Ok(ref wc) => tracing::info!(
                        document = %path.display(),
                        word,
                        count = wc.count,
                        "word frequency"
                    ),
                    Err(ref e) => {
                        tracing::warn!(document = %path.display(), error = %e, "word count failed")
                    }
                }
                DocumentResult {
                    path: path.clone(),
                    outcome,
                }
            })
            .collect())
    }

    fn extract_document(&self, path: &Path, keyword: &str) -> Result<KeywordReport> {
        let data = load_document(path)?;
        let texts = self.extractor.page_texts(path, &data)?;

        let matched_pages: Vec<u32> = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| page_matches(text.as_deref(), keyword))
            .map(|(index, _)| index as u32)
            .collect();

        if matched_pages.is_empty() {
            tracing::info!(document = %path.display(), keyword, "No pages containing keyword");
            return Ok(KeywordReport {
                matched_pages,
                pages_scanned: texts.len(),
                output_path: None,
            });
        }

        let name = path.display().to_string();
        let output = QpdfWrapper::select_pages(
            &PdfInput {
                name: &name,
                data: &data,
            },
            &matched_pages,
        )?;

        let output_path = self.keyword_output_path(path);
        write_output(&output_path, &output)?;

        tracing::info!(
            document = %path.display(),
            keyword,
            pages = matched_pages.len(),
            output = %output_path.display(),
            "Pages with keyword saved"
        );

        Ok(KeywordReport {
            matched_pages,
            pages_scanned: texts.len(),
            output_path: Some(output_path.display().to_string()),
        })
    }

    fn count_in_document(&self, path: &Path, word: &str) -> Result<WordCount> {
        let data = load_document(path)?;
        let texts = self.extractor.page_texts(path, &data)?;

        let count = texts
            .iter()
            .flatten()
            .map(|text| count_ignore_case(text, word))
            .sum();

        Ok(WordCount {
            count,
            pages_scanned: texts.len(),
        })
    }
}

/// Read a document from disk and check it looks like a PDF
fn load_document(path: &Path) -> Result<Vec<u8>> {
    let data = std::fs::read(path).map_err(|e| Error::DocumentOpen {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::DocumentOpen {
            path: path.display().to_string(),
            reason: "Not a valid PDF file".to_string(),
        });
    }

    Ok(data)
}

/// Write an output document through a temporary sibling, renamed into place.
/// On failure the temporary is removed and the destination is untouched.
fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let result = std::fs::write(&partial, data).and_then(|_| std::fs::rename(&partial, path));

    result.map_err(|source| {
        let _ = std::fs::remove_file(&partial);
        Error::OutputWrite {
            path: path.display().to_string(),
            source,
        }
    })
}
