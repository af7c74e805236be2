//! Error types for the flashyy library.
//!
//! One enum per failure family, plus a run-level enum for the ingestion
//! pipeline:
//!
//! * [`ExtractionError`]: the document could not be read or its text layer
//!   could not be extracted.
//! * [`GenerationError`]: the generative model could not be reached or
//!   rejected the request.
//! * [`StoreError`]: the row-store refused or failed a request.
//! * [`IngestError`]: what a whole ingestion run returns. Every variant is
//!   terminal for the run; nothing is retried and no partial set of cards is
//!   kept.
//! * [`LibraryError`]: an edit to the local card library was refused.
//! * [`PracticeError`]: there was nothing to practise.

use std::path::PathBuf;
use thiserror::Error;

/// The document could not be turned into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The bytes do not start with the `%PDF` magic.
    #[error("'{name}' is not a PDF document\nFirst bytes: {magic:?}")]
    NotAPdf { name: String, magic: Vec<u8> },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{name}' is corrupt: {detail}")]
    CorruptPdf { name: String, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{name}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { name: String },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{name}'")]
    WrongPassword { name: String },

    /// pdfium could not load the text layer of one page.
    #[error("Text extraction failed for page {page}: {detail}")]
    PageText { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH to the directory holding libpdfium, or install it system-wide."
    )]
    PdfiumBindingFailed(String),

    /// The blocking extraction task did not complete.
    #[error("Extraction task failed: {0}")]
    TaskFailed(String),

    /// Reading the document from disk failed for another reason.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The generative model call failed.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The provider returned an error (network, quota, auth, malformed body).
    #[error("LLM API error: {message}")]
    Api { message: String },
}

/// A row-store request failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The row does not exist or is not owned by the caller.
    #[error("{table} row '{id}' not found")]
    NotFound { table: &'static str, id: String },

    /// The backend rejected the credentials (HTTP 401/403).
    #[error("Row-store rejected the session: {detail}\nSign in again with `flashyy login`.")]
    Unauthorized { detail: String },

    /// The backend answered with a non-success status.
    #[error("Row-store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never got an answer.
    #[error("Row-store request failed: {0}")]
    Transport(String),

    /// The answer could not be decoded into rows.
    #[error("Row-store response could not be decoded: {0}")]
    Decode(String),

    /// Backend configuration is unusable.
    #[error("Invalid row-store configuration: {0}")]
    InvalidConfig(String),
}

/// Fatal error for one ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Parsing produced zero drafts; nothing was sent to the row-store.
    #[error("No valid flashcards found.\nUse the format 'Q: question' followed by 'A: answer'.")]
    NoValidFlashcards,

    #[error("Failed to save flashcards: {0}")]
    Persist(#[from] StoreError),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A library operation was refused or failed.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A card side was blank after trimming.
    #[error("The {0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Please enter a group name")]
    EmptyGroupName,

    /// Not a palette name or palette hex value.
    #[error("Unknown group colour '{0}'\nUse one of the palette names, e.g. softGray or sage.")]
    UnknownColor(String),

    /// Cards can only be added to a selected group.
    #[error("Please select or create a group first")]
    NoGroupSelected,

    #[error("No group with id {0}")]
    UnknownGroup(uuid::Uuid),

    #[error("No card with id {0}")]
    UnknownCard(uuid::Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// A practice session could not start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PracticeError {
    #[error("Add some flashcards first!")]
    NoCards,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_valid_flashcards_mentions_format() {
        let msg = IngestError::NoValidFlashcards.to_string();
        assert!(msg.contains("Q: question"), "got: {msg}");
    }

    #[test]
    fn extraction_error_is_transparent() {
        let e: IngestError = ExtractionError::PasswordRequired {
            name: "notes.pdf".into(),
        }
        .into();
        assert!(e.to_string().starts_with("PDF 'notes.pdf' is encrypted"));
    }

    #[test]
    fn persist_wraps_store_error() {
        let e: IngestError = StoreError::Http {
            status: 500,
            body: "boom".into(),
        }
        .into();
        let msg = e.to_string();
        assert!(msg.contains("500"), "got: {msg}");
        assert!(msg.contains("boom"), "got: {msg}");
    }

    #[test]
    fn empty_field_names_the_side() {
        assert_eq!(
            LibraryError::EmptyField("answer").to_string(),
            "The answer cannot be empty"
        );
    }

    #[test]
    fn not_found_display() {
        let e = StoreError::NotFound {
            table: "cards",
            id: "abc".into(),
        };
        assert_eq!(e.to_string(), "cards row 'abc' not found");
    }
}
