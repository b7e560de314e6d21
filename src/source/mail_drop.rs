//! Directory-backed mail drop
//!
//! Layout: `<root>/<subject>/...`. Every file below a subject folder (at any
//! depth, one folder per message if the exporter likes) is an attachment of a
//! message with that exact subject.

use super::AttachmentSource;
use crate::error::{Error, Result};
use crate::processor::is_pdf_path;
use std::path::{Component, Path, PathBuf};

/// Attachment source reading messages exported to a local folder
#[derive(Debug, Clone)]
pub struct MailDropSource {
    root: PathBuf,
}

impl MailDropSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Folder holding the messages for `subject`
    fn subject_dir(&self, subject: &str) -> Result<PathBuf> {
        let candidate = Path::new(subject);
        let mut components = candidate.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(subject)),
            _ => Err(Error::AttachmentSource {
                reason: format!("subject {:?} cannot be used as a folder name", subject),
            }),
        }
    }

    /// Attachment files for a subject, sorted by path
    fn attachments(&self, subject_dir: &Path) -> Result<Vec<PathBuf>> {
        let pattern = format!(
            "{}/**/*",
            glob::Pattern::escape(&subject_dir.to_string_lossy())
        );

        let entries = glob::glob(&pattern).map_err(|e| Error::AttachmentSource {
            reason: format!("invalid mail drop pattern: {}", e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable mail drop entry"),
            }
        }
        files.sort();
        Ok(files)
    }
}

impl AttachmentSource for MailDropSource {
    fn fetch(&self, subject: &str, output_dir: &Path, pdfs_only: bool) -> Result<Vec<PathBuf>> {
        let subject_dir = self.subject_dir(subject)?;

        if !subject_dir.is_dir() {
            tracing::info!(subject, root = %self.root.display(), "Found 0 messages with subject");
            return Ok(Vec::new());
        }

        let attachments = self.attachments(&subject_dir)?;
        tracing::info!(subject, attachments = attachments.len(), "Found attachments for subject");

        std::fs::create_dir_all(output_dir)?;

        // An output folder below the subject folder holds earlier outputs, not attachments
        let output_root = std::fs::canonicalize(output_dir)?;
        let subject_root = std::fs::canonicalize(&subject_dir)?;
        let nested_output = output_root != subject_root && output_root.starts_with(&subject_root);

        let mut saved = Vec::new();
        for attachment in attachments {
            if pdfs_only && !is_pdf_path(&attachment) {
                continue;
            }

            let Some(file_name) = attachment.file_name() else {
                continue;
            };
            let source_path = std::fs::canonicalize(&attachment)?;
            if nested_output && source_path.starts_with(&output_root) {
                tracing::debug!(path = %attachment.display(), "skipping file inside output directory");
                continue;
            }

            let target = output_dir.join(file_name);
            if saved.contains(&target) {
                tracing::warn!(target = %target.display(), "attachment name repeated, later copy wins");
            }

            // Copying a file onto itself truncates it
            if std::fs::canonicalize(&target).ok().as_ref() == Some(&source_path) {
                tracing::debug!(path = %target.display(), "attachment already in output directory");
            } else {
                std::fs::copy(&attachment, &target).map_err(|source| Error::OutputWrite {
                    path: target.display().to_string(),
                    source,
                })?;
                tracing::info!(path = %target.display(), "Saved attachment");
            }

            if !saved.contains(&target) {
                saved.push(target);
            }
        }

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(path: &Path, contents: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_unknown_subject_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let source = MailDropSource::new(root.path());

        let saved = source.fetch("Quarterly report", out.path(), false).unwrap();
        assert!(saved.is_empty());
    }

    #[test]
    fn test_copies_attachments_into_output() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&root.path().join("Invoices/msg1/a.pdf"), b"%PDF-a");
        write(&root.path().join("Invoices/msg2/b.txt"), b"notes");
        write(&root.path().join("Other/c.pdf"), b"%PDF-c");

        let source = MailDropSource::new(root.path());
        let saved = source.fetch("Invoices", out.path(), false).unwrap();

        assert_eq!(
            saved,
            vec![out.path().join("a.pdf"), out.path().join("b.txt")]
        );
        assert_eq!(std::fs::read(out.path().join("a.pdf")).unwrap(), b"%PDF-a");
        assert!(!out.path().join("c.pdf").exists());
    }

    #[test]
    fn test_pdfs_only_skips_other_files() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&root.path().join("Invoices/a.PDF"), b"%PDF-a");
        write(&root.path().join("Invoices/b.txt"), b"notes");

        let source = MailDropSource::new(root.path());
        let saved = source.fetch("Invoices", out.path(), true).unwrap();

        assert_eq!(saved, vec![out.path().join("a.PDF")]);
    }

    #[test]
    fn test_creates_output_directory() {
        let root = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let nested = out.path().join("nested/dir");
        write(&root.path().join("S/a.pdf"), b"%PDF-a");

        let saved = MailDropSource::new(root.path())
            .fetch("S", &nested, false)
            .unwrap();
        assert_eq!(saved, vec![nested.join("a.pdf")]);
    }

    #[test]
    fn test_rejects_path_like_subjects() {
        let root = tempfile::tempdir().unwrap();
        let source = MailDropSource::new(root.path());
        for subject in ["../escape", "a/b", "", ".."] {
            assert!(
                source.fetch(subject, root.path(), false).is_err(),
                "subject {:?} should be rejected",
                subject
            );
        }
    }

    #[test]
    fn test_output_dir_equal_to_subject_folder_keeps_attachments() {
        let root = tempfile::tempdir().unwrap();
        let subject_dir = root.path().join("S");
        write(&subject_dir.join("a.pdf"), b"%PDF-1.4 body");

        let saved = MailDropSource::new(root.path())
            .fetch("S", &subject_dir, false)
            .unwrap();

        assert_eq!(saved, vec![subject_dir.join("a.pdf")]);
        assert_eq!(
            std::fs::read(subject_dir.join("a.pdf")).unwrap(),
            b"%PDF-1.4 body"
        );
    }

    #[test]
    fn test_output_dir_inside_subject_folder_is_not_refetched() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("S/out");
        write(&root.path().join("S/msg1/a.pdf"), b"%PDF-a");
        write(&out.join("Combined_documents.pdf"), b"%PDF-old");

        let saved = MailDropSource::new(root.path())
            .fetch("S", &out, false)
            .unwrap();

        assert_eq!(saved, vec![out.join("a.pdf")]);
        assert_eq!(
            std::fs::read(out.join("Combined_documents.pdf")).unwrap(),
            b"%PDF-old"
        );
    }
}
