//! Prompt construction for flashcard generation.
//!
//! The prompt is a pure function of the extracted text: a card quota derived
//! from the document's size is interpolated into a fixed instruction template,
//! followed verbatim by the full text. Callers can substitute their own
//! template via [`crate::config::IngestConfig::prompt_template`]; it must keep
//! the `{min_cards}` and `{text}` placeholders.

use crate::output::{ExtractedText, GenerationPrompt};
use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum cards asked for per page.
pub const CARDS_PER_PAGE: usize = 8;

/// Word count at which a document is considered long.
pub const LONG_DOCUMENT_WORDS: usize = 1000;

/// Floor for documents under [`LONG_DOCUMENT_WORDS`].
pub const SHORT_DOCUMENT_MIN_CARDS: usize = 20;

/// Floor for documents at or over [`LONG_DOCUMENT_WORDS`].
pub const LONG_DOCUMENT_MIN_CARDS: usize = 60;

/// Default instruction template.
///
/// `{min_cards}` appears twice (stated requirement and closing reminder);
/// `{text}` is replaced by the extracted document text.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You are an expert teacher creating study flashcards from a document.

Create AT LEAST {min_cards} flashcards that cover the document below.

Follow these rules precisely:

1. FORMAT
   - Start every question line with "Q: " and every answer line with "A: "
   - Put each answer on the line directly after its question
   - Separate flashcards with a blank line
   - Keep each question and each answer on a single line

2. CONTENT
   - Each answer must be a complete explanation of at least one full sentence
   - Cover every page and every major section, not just the beginning
   - Include definitions, key facts, processes, causes and effects, and examples
   - Do not invent facts that are not supported by the document

3. OUTPUT
   - Output ONLY the flashcards
   - Do NOT number the flashcards
   - Do NOT add headings, commentary, or markdown

Remember: you must produce at least {min_cards} flashcards.

Document:
{text}"#;

static RE_PAGE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"Page \d+:").unwrap());

/// Number of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of `Page N:` markers.
pub fn page_marker_count(text: &str) -> usize {
    RE_PAGE_MARKER.find_iter(text).count()
}

/// Card quota: `max(pages * 8, words < 1000 ? 20 : 60)`.
pub fn min_cards(page_count: usize, word_count: usize) -> usize {
    let floor = if word_count < LONG_DOCUMENT_WORDS {
        SHORT_DOCUMENT_MIN_CARDS
    } else {
        LONG_DOCUMENT_MIN_CARDS
    };
    page_count.saturating_mul(CARDS_PER_PAGE).max(floor)
}

/// Build the generation prompt with the default template.
pub fn build_prompt(extracted: &ExtractedText) -> GenerationPrompt {
    build_prompt_with(extracted, DEFAULT_PROMPT_TEMPLATE)
}

/// Build the generation prompt with a caller-supplied template.
///
/// The page count comes from the markers in the text, not from
/// `extracted.pages`, so plain text carrying its own markers counts too.
pub fn build_prompt_with(extracted: &ExtractedText, template: &str) -> GenerationPrompt {
    let word_count = word_count(&extracted.text);
    let page_count = page_marker_count(&extracted.text);
    let min_cards = min_cards(page_count, word_count);

    // {text} last so document text containing "{min_cards}" stays verbatim.
    let text = template
        .replace("{min_cards}", &min_cards.to_string())
        .replace("{text}", &extracted.text);

    GenerationPrompt {
        text,
        min_cards,
        page_count,
        word_count,
    }
}

/// Whether a custom template has both placeholders.
pub fn is_valid_template(template: &str) -> bool {
    template.contains("{min_cards}") && template.contains("{text}")
}
