//! # flashyy
//!
//! Flashcards from your documents: extract a PDF's text, ask a language
//! model for `Q:`/`A:` pairs, and save them into a group.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract   page text via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 2. Prompt    quota = max(pages × 8, words < 1000 ? 20 : 60)
//!  ├─ 3. Generate  one call to gpt-4.1-nano / claude / gemini / …
//!  ├─ 4. Parse     line scanner over "Q:" / "A:" prefixes
//!  └─ 5. Persist   one bulk insert into the row-store
//! ```
//!
//! Around the pipeline sit the pieces of a small study app: a [`Library`]
//! of groups and cards backed by a [`RowStore`], and a [`PracticeDeck`] that
//! shuffles cards for review.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flashyy::{ingest, CardTarget, IngestConfig, MemoryStore};
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = IngestConfig::default();
//!     let store = MemoryStore::new();
//!     let target = CardTarget::new(Uuid::new_v4(), Uuid::new_v4());
//!
//!     let output = ingest("lecture.pdf", target, &store, &config).await?;
//!     for card in &output.cards {
//!         println!("Q: {}\nA: {}\n", card.question, card.answer);
//!     }
//!     eprintln!("{} cards (asked for at least {})",
//!         output.stats.parsed_cards,
//!         output.stats.min_cards);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `flashyy` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! flashyy = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod ingest;
pub mod library;
pub mod output;
pub mod pipeline;
pub mod practice;
pub mod progress;
pub mod prompts;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BackendConfig, IngestConfig, IngestConfigBuilder};
pub use error::{
    ExtractionError, GenerationError, IngestError, LibraryError, PracticeError, StoreError,
};
pub use ingest::{
    import_text, ingest, ingest_document, ingest_text, inspect, preview, preview_document,
};
pub use library::Library;
pub use output::{
    ExtractedText, FlashcardDraft, GenerationPrompt, GenerationResult, IngestOutput, IngestStats,
    Inspection, PageText, Preview,
};
pub use pipeline::generate::{Generator, LlmGenerator};
pub use pipeline::input::{load_document, Document};
pub use pipeline::parse::{parse_bulk_text, parse_flashcards};
pub use pipeline::persist::CardTarget;
pub use practice::{DeckPosition, PracticeDeck, PracticeSelection, SwipeDirection, SwipeOutcome};
pub use progress::{IngestProgressCallback, IngestStage, NoopProgressCallback, ProgressCallback};
pub use store::{
    Card, CardPatch, Group, GroupPatch, MemoryStore, NewCard, NewGroup, RowStore, Session,
    SupabaseAuth, SupabaseStore,
};
