//! Flashcard parsing: recover question/answer pairs from free text.
//!
//! Two readers share the `Q:`/`A:` convention:
//!
//! - [`parse_flashcards`] scans model output line by line. It is a two-state
//!   scanner (awaiting a question, awaiting an answer) and never fails;
//!   malformed input just yields fewer drafts.
//! - [`parse_bulk_text`] reads text pasted by a user, one pair per
//!   blank-line-separated block.
//!
//! Neither reader joins multi-line answers.

use crate::output::FlashcardDraft;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const QUESTION_PREFIX: &str = "Q:";
const ANSWER_PREFIX: &str = "A:";

/// Parse model output into drafts, in the order their `Q:` lines appear.
///
/// - A `Q:` line starts a new question. The previous pair is emitted first
///   if both halves are non-empty.
/// - An `A:` line sets the answer for the current question. A later `A:`
///   line before the next `Q:` replaces it.
/// - Other lines are ignored.
///
/// A question with no answer before the next `Q:` (or the end) is dropped.
pub fn parse_flashcards(text: &str) -> Vec<FlashcardDraft> {
    let mut drafts = Vec::new();
    let mut question = String::new();
    let mut answer = String::new();

    for line in text.split('\n') {
        if let Some(rest) = line.strip_prefix(QUESTION_PREFIX) {
            if !question.is_empty() && !answer.is_empty() {
                drafts.push(take_pair(&mut question, &mut answer));
            }
            question = rest.trim().to_string();
            answer.clear();
        } else if let Some(rest) = line.strip_prefix(ANSWER_PREFIX) {
            answer = rest.trim().to_string();
        }
    }

    if !question.is_empty() && !answer.is_empty() {
        drafts.push(take_pair(&mut question, &mut answer));
    }

    debug!("Parsed {} flashcards from {} chars", drafts.len(), text.len());
    drafts
}

fn take_pair(question: &mut String, answer: &mut String) -> FlashcardDraft {
    FlashcardDraft::new(std::mem::take(question), std::mem::take(answer))
}

// ── Bulk text ────────────────────────────────────────────────────────────────

static RE_BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static RE_BULK_QUESTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"Q:\s*(.+)").unwrap());
static RE_BULK_ANSWER: Lazy<Regex> = Lazy::new(|| Regex::new(r"A:\s*(.+)").unwrap());

/// Parse user-pasted text: one pair per blank-line-separated block, taking
/// the first `Q:` and the first `A:` match in each block.
///
/// Blocks missing either half, or whose halves trim to nothing, are skipped.
pub fn parse_bulk_text(text: &str) -> Vec<FlashcardDraft> {
    RE_BLOCK_SEPARATOR
        .split(text)
        .filter_map(|block| {
            let question = first_capture(&RE_BULK_QUESTION, block)?;
            let answer = first_capture(&RE_BULK_ANSWER, block)?;
            Some(FlashcardDraft::new(question, answer))
        })
        .collect()
}

fn first_capture(re: &Regex, block: &str) -> Option<String> {
    let value = re.captures(block)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}
