//! Case-insensitive path and text matching

use std::path::Path;

/// Whether a path names a PDF, judged by a case-insensitive ".pdf" suffix
pub fn is_pdf_path(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".pdf")
}

/// Whether `text` contains `needle`, ignoring case.
/// An empty needle is contained in every string.
pub fn contains_ignore_case(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

/// Count non-overlapping occurrences of `needle` in `text`, ignoring case.
///
/// This is a plain substring count: "cat" is found inside "category".
/// Scanning resumes after the end of each match, so "aaaa" holds "aa" twice.
/// An empty needle counts zero.
pub fn count_ignore_case(text: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&needle.to_lowercase()).count()
}

/// Whether a page's extracted text matches a keyword.
/// Pages without text never match, even for an empty keyword.
pub fn page_matches(text: Option<&str>, keyword: &str) -> bool {
    match text {
        Some(t) if !t.is_empty() => contains_ignore_case(t, keyword),
        _ => false,
    }
}
