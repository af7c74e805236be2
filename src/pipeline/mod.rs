//! Pipeline stages for PDF-to-flashcard ingestion.
//!
//! Each submodule implements exactly one step. The stages run strictly in
//! order; none starts before the previous one finished.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ prompts ──▶ generate ──▶ parse ──▶ persist
//! (bytes)   (pdfium)    (quota)     (LLM)        (Q:/A:)   (row-store)
//! ```
//!
//! 1. [`input`]: read the document and check it is a PDF
//! 2. [`extract`]: join each page's text fragments; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`crate::prompts`]: compute the card quota and fill the template
//! 4. [`generate`]: one model call, no retry
//! 5. [`parse`]: tolerant line scanner over the completion
//! 6. [`persist`]: a single bulk insert, all-or-nothing

pub mod extract;
pub mod generate;
pub mod input;
pub mod parse;
pub mod persist;
