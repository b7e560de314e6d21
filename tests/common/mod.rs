//! Shared fixtures: generated PDFs and a content-stream text extractor
#![allow(dead_code)]

use pdf_batch_mcp::pdf::PageTextExtractor;
use pdf_batch_mcp::{Error, Result};
use std::path::{Path, PathBuf};

fn escape_pdf_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Build a PDF with one page per entry; each line of an entry is shown as text.
/// An empty entry produces a page with no text at all.
pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    let mut pdf_bytes = Vec::new();
    pdf_bytes.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::new();

    // Object 1: Catalog
    offsets.push(pdf_bytes.len());
    pdf_bytes.extend_from_slice(b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    // Object 2: Pages
    offsets.push(pdf_bytes.len());
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", i + 4)).collect();
    pdf_bytes.extend_from_slice(
        format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            page_count
        )
        .as_bytes(),
    );

    // Object 3: Font
    offsets.push(pdf_bytes.len());
    pdf_bytes.extend_from_slice(
        b"3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n",
    );

    // Page objects: 4 .. 4+n, content streams follow
    for i in 0..page_count {
        offsets.push(pdf_bytes.len());
        pdf_bytes.extend_from_slice(
            format!(
                "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >>\nendobj\n",
                i + 4,
                i + 4 + page_count
            )
            .as_bytes(),
        );
    }

    for (i, text) in pages.iter().enumerate() {
        let mut content = String::new();
        for (line_no, line) in text.lines().enumerate() {
            content.push_str(&format!(
                "BT /F1 12 Tf 72 {} Td ({}) Tj ET\n",
                700 - line_no * 16,
                escape_pdf_string(line)
            ));
        }
        offsets.push(pdf_bytes.len());
        pdf_bytes.extend_from_slice(
            format!(
                "{} 0 obj\n<< /Length {} >>\nstream\n{}endstream\nendobj\n",
                i + 4 + page_count,
                content.len(),
                content
            )
            .as_bytes(),
        );
    }

    let xref_offset = pdf_bytes.len();
    pdf_bytes.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    pdf_bytes.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        pdf_bytes.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf_bytes.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );

    pdf_bytes
}

/// Write a generated PDF into `dir` and return its path
pub fn write_pdf(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(pages)).expect("Failed to write fixture");
    path
}

/// Text shown by each page's `Tj` operators, read back with lopdf
pub fn shown_text(data: &[u8]) -> std::result::Result<Vec<Option<String>>, String> {
    let doc = lopdf::Document::load_mem(data).map_err(|e| e.to_string())?;

    let mut texts = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let content = doc.get_page_content(page_id).map_err(|e| e.to_string())?;
        let content = lopdf::content::Content::decode(&content).map_err(|e| e.to_string())?;

        let lines: Vec<String> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(lopdf::Object::String(bytes, _)) => {
                    Some(String::from_utf8_lossy(bytes).to_string())
                }
                _ => None,
            })
            .collect();

        texts.push(if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        });
    }
    Ok(texts)
}

/// Page texts of a PDF on disk
pub fn page_texts_of(path: &Path) -> Vec<Option<String>> {
    let data = std::fs::read(path).expect("Failed to read output");
    shown_text(&data).expect("Failed to parse output")
}

/// Extractor reading the text our fixtures put on each page
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureExtractor;

impl PageTextExtractor for FixtureExtractor {
    fn page_texts(&self, path: &Path, data: &[u8]) -> Result<Vec<Option<String>>> {
        shown_text(data).map_err(|reason| Error::TextExtraction {
            path: path.display().to_string(),
            reason,
        })
    }
}
