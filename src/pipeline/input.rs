//! Document input: load a user-supplied PDF into memory.
//!
//! pdfium reads from a byte slice, so the whole file is read once and
//! handed to the extractor. The `%PDF` magic is checked up front so callers
//! get a meaningful error rather than a pdfium parse failure.

use crate::error::ExtractionError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A document supplied for one upload. Not persisted.
#[derive(Clone)]
pub struct Document {
    /// Declared name, used in messages. For files, the file name.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl Document {
    /// Wrap in-memory bytes, validating the PDF magic.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ExtractionError> {
        let name = name.into();
        if !bytes.starts_with(PDF_MAGIC) {
            let magic = bytes.iter().take(4).copied().collect();
            return Err(ExtractionError::NotAPdf { name, magic });
        }
        Ok(Self { name, bytes })
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / (1024.0 * 1024.0)
    }

    /// Warn (without failing) when the document exceeds the soft size guideline.
    pub fn check_size_guideline(&self, max_bytes: u64) -> bool {
        let within = self.bytes.len() as u64 <= max_bytes;
        if !within {
            warn!(
                "'{}' is {:.2}MB, above the {:.0}MB guideline; continuing",
                self.name,
                self.size_mb(),
                max_bytes as f64 / (1024.0 * 1024.0)
            );
        }
        within
    }
}

/// Read a local PDF file.
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document, ExtractionError> {
    let path = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| io_error(path.clone(), e))?;

    let name = display_name(&path);
    debug!("Read '{}' ({} bytes)", name, bytes.len());
    Document::from_bytes(name, bytes)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn io_error(path: PathBuf, e: std::io::Error) -> ExtractionError {
    match e.kind() {
        ErrorKind::NotFound => ExtractionError::FileNotFound { path },
        ErrorKind::PermissionDenied => ExtractionError::PermissionDenied { path },
        _ => ExtractionError::Io { path, source: e },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = Document::from_bytes("notes.txt", b"Q: hi".to_vec()).unwrap_err();
        match err {
            ExtractionError::NotAPdf { name, magic } => {
                assert_eq!(name, "notes.txt");
                assert_eq!(magic, b"Q: h".to_vec());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn accepts_pdf_magic() {
        let doc = Document::from_bytes("a.pdf", b"%PDF-1.7\n...".to_vec()).unwrap();
        assert_eq!(doc.name, "a.pdf");
    }

    #[test]
    fn size_guideline_is_soft() {
        let doc = Document::from_bytes("a.pdf", b"%PDF-1.7 0123456789".to_vec()).unwrap();
        assert!(doc.check_size_guideline(1024));
        assert!(!doc.check_size_guideline(4));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = load_document("/definitely/not/here.pdf").await.unwrap_err();
        assert!(matches!(err, ExtractionError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn loads_file_name() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.4\n%%EOF").unwrap();
        let doc = load_document(tmp.path()).await.unwrap();
        assert!(doc.name.ends_with(".pdf"));
        assert_eq!(doc.bytes.len(), 14);
    }
}
