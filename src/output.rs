//! Values passed between pipeline stages, and what a run returns.

use crate::store::Card;
use serde::{Deserialize, Serialize};

/// Text of one page, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_num: usize,
    pub text: String,
}

impl PageText {
    pub fn new(page_num: usize, text: impl Into<String>) -> Self {
        Self {
            page_num,
            text: text.into(),
        }
    }

    /// Character count of the page text (not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Page-delimited document text.
///
/// `text` is the concatenation of `"Page {n}:\n{page text}\n\n"` for every
/// page in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub pages: Vec<PageText>,
    pub text: String,
}

impl ExtractedText {
    /// Assemble from pages. Pages must already be in document order with
    /// 1-based, strictly increasing numbers.
    pub fn from_pages(pages: Vec<PageText>) -> Self {
        debug_assert!(pages.windows(2).all(|w| w[0].page_num < w[1].page_num));

        let mut text = String::new();
        for page in &pages {
            text.push_str(&format!("Page {}:\n{}\n\n", page.page_num, page.text));
        }
        Self { pages, text }
    }

    /// Wrap plain text that did not come from a paged document.
    pub fn from_plain(text: impl Into<String>) -> Self {
        Self {
            pages: Vec::new(),
            text: text.into(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Instruction prompt sent to the generative model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPrompt {
    pub text: String,
    /// Minimum number of cards the prompt asks for.
    pub min_cards: usize,
    pub page_count: usize,
    pub word_count: usize,
}

/// Raw completion returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl GenerationResult {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// An unpersisted question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDraft {
    pub question: String,
    pub answer: String,
}

impl FlashcardDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Canonical `Q:`/`A:` form, the format the parser reads back.
    pub fn to_qa_block(&self) -> String {
        format!("Q: {}\nA: {}\n\n", self.question, self.answer)
    }
}

/// Result of a successful ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOutput {
    /// Rows as returned by the row-store, in draft order.
    pub cards: Vec<Card>,
    pub stats: IngestStats,
}

/// Result of a dry run: everything up to parsing, nothing persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preview {
    pub prompt: GenerationPrompt,
    /// Completion as returned by the model, kept so an empty parse can be
    /// inspected.
    pub response: GenerationResult,
    pub drafts: Vec<FlashcardDraft>,
    pub stats: IngestStats,
}

/// Extraction and quota for a document, without calling the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub extracted: ExtractedText,
    pub prompt: GenerationPrompt,
    pub stats: IngestStats,
}

/// Diagnostics collected along the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    pub page_count: usize,
    pub word_count: usize,
    pub text_chars: usize,
    /// Pages whose text fell below the short-page threshold (1-indexed).
    pub short_pages: Vec<usize>,
    pub min_cards: usize,
    pub parsed_cards: usize,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub extract_duration_ms: u64,
    pub generate_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl IngestStats {
    /// Average characters per page, 0 for documents with no pages.
    pub fn average_chars_per_page(&self) -> usize {
        if self.page_count == 0 {
            0
        } else {
            self.text_chars / self.page_count
        }
    }
}
