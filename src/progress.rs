//! Progress-callback trait for ingestion events.
//!
//! Inject an [`Arc<dyn IngestProgressCallback>`] via
//! [`crate::config::IngestConfigBuilder::progress_callback`] to observe a run
//! as it moves through its stages. Stages run strictly one after another, so
//! events arrive in order.
//!
//! # Example
//!
//! ```rust
//! use flashyy::{IngestConfig, IngestProgressCallback, IngestStage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl IngestProgressCallback for Printer {
//!     fn on_stage_start(&self, stage: IngestStage) {
//!         eprintln!("{} …", stage);
//!     }
//! }
//!
//! let config = IngestConfig::builder()
//!     .progress_callback(Arc::new(Printer))
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// The five pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestStage {
    Extract,
    Prompt,
    Generate,
    Parse,
    Persist,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IngestStage::Extract => "Extracting text",
            IngestStage::Prompt => "Building prompt",
            IngestStage::Generate => "Generating flashcards",
            IngestStage::Parse => "Parsing flashcards",
            IngestStage::Persist => "Saving flashcards",
        };
        f.write_str(s)
    }
}

/// Receives events from an ingestion run. All methods default to no-ops.
pub trait IngestProgressCallback: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_start(&self, stage: IngestStage) {
        let _ = stage;
    }

    /// Called when a stage finishes without error.
    ///
    /// `detail` is a short human-readable summary, e.g. "3 pages".
    fn on_stage_complete(&self, stage: IngestStage, detail: &str) {
        let _ = (stage, detail);
    }

    /// Called after each page's text is extracted.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number
    /// * `total_pages`: pages in the document
    /// * `chars`      : characters extracted from the page
    fn on_page_extracted(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called for a page below the short-page threshold. Not an error.
    fn on_short_page(&self, page_num: usize, chars: usize) {
        let _ = (page_num, chars);
    }

    /// Called once when a stage fails; the run ends after this.
    fn on_failure(&self, stage: IngestStage, error: &str) {
        let _ = (stage, error);
    }
}

/// The default when no callback is configured.
pub struct NoopProgressCallback;

impl IngestProgressCallback for NoopProgressCallback {}

/// Type stored in [`crate::config::IngestConfig`].
pub type ProgressCallback = Arc<dyn IngestProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl IngestProgressCallback for Recorder {
        fn on_stage_start(&self, stage: IngestStage) {
            self.events.lock().unwrap().push(format!("start {stage:?}"));
        }

        fn on_short_page(&self, page_num: usize, _chars: usize) {
            self.events.lock().unwrap().push(format!("short {page_num}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage_start(IngestStage::Extract);
        cb.on_page_extracted(1, 2, 40);
        cb.on_short_page(1, 40);
        cb.on_stage_complete(IngestStage::Extract, "2 pages");
        cb.on_failure(IngestStage::Generate, "timeout");
    }

    #[test]
    fn overridden_methods_receive_events() {
        let rec = Recorder::default();
        rec.on_stage_start(IngestStage::Parse);
        rec.on_short_page(3, 12);
        rec.on_stage_complete(IngestStage::Parse, "ignored");
        assert_eq!(*rec.events.lock().unwrap(), vec!["start Parse", "short 3"]);
    }

    #[test]
    fn stage_display() {
        assert_eq!(IngestStage::Generate.to_string(), "Generating flashcards");
    }
}
