//! Performance benchmarks for the PDF batch tool
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pdf_batch_mcp::processor::{count_ignore_case, page_matches};
use pdf_batch_mcp::pdf::{PageTextExtractor, PdfInput, QpdfWrapper};
use pdf_batch_mcp::{PdfBatchProcessor, Result};
use std::path::{Path, PathBuf};

/// Extractor returning no text; benchmarks below never reach it
struct NoText;

impl PageTextExtractor for NoText {
    fn page_texts(&self, _path: &Path, _data: &[u8]) -> Result<Vec<Option<String>>> {
        Ok(Vec::new())
    }
}

fn sample_page(words: usize) -> String {
    let vocabulary = ["Invoice", "category", "total", "concatenate", "Cat", "due"];
    (0..words)
        .map(|i| vocabulary[i % vocabulary.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Minimal one-page PDF for merge benchmarks
fn blank_pdf() -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>",
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>",
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>",
    ];
    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        )
        .as_bytes(),
    );
    pdf
}

/// Benchmark case-insensitive substring counting
fn bench_word_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_count");

    for words in [100, 1_000, 10_000] {
        let page = sample_page(words);
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::new("cat", words), &page, |b, page| {
            b.iter(|| count_ignore_case(black_box(page), black_box("cat")));
        });
    }

    group.finish();
}

/// Benchmark keyword matching across pages
fn bench_keyword_match(c: &mut Criterion) {
    let pages: Vec<Option<String>> = (0..200).map(|i| Some(sample_page(50 + i))).collect();

    c.bench_function("keyword_match_200_pages", |b| {
        b.iter(|| {
            pages
                .iter()
                .filter(|p| page_matches(p.as_deref(), black_box("invoice")))
                .count()
        });
    });
}

/// Benchmark building the working set from a large attachment list
fn bench_working_set(c: &mut Criterion) {
    let paths: Vec<PathBuf> = (0..10_000)
        .map(|i| match i % 3 {
            0 => PathBuf::from(format!("/mail/{}.pdf", i)),
            1 => PathBuf::from(format!("/mail/{}.PDF", i)),
            _ => PathBuf::from(format!("/mail/{}.xlsx", i)),
        })
        .collect();

    c.bench_function("working_set_10k", |b| {
        b.iter(|| {
            let processor =
                PdfBatchProcessor::with_extractor(black_box(paths.clone()), "/out", NoText);
            processor.documents().len()
        });
    });
}

/// Benchmark merging many small documents with qpdf
fn bench_merge(c: &mut Criterion) {
    let data = blank_pdf();
    let mut group = c.benchmark_group("merge");

    for count in [4, 20, 100] {
        let names: Vec<String> = (0..count).map(|i| format!("{}.pdf", i)).collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("blank_pages", count), &names, |b, names| {
            b.iter(|| {
                let inputs: Vec<PdfInput<'_>> = names
                    .iter()
                    .map(|name| PdfInput {
                        name,
                        data: &data,
                    })
                    .collect();
                QpdfWrapper::merge(black_box(&inputs)).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_word_count,
    bench_keyword_match,
    bench_working_set,
    bench_merge,
);

criterion_main!(benches);
