//! Ingestion entry points.
//!
//! A run is strictly linear: extract → prompt → generate → parse → persist.
//! Every error is terminal for the run and nothing is kept from a failed
//! one. The model is never called twice and the row-store sees at most one
//! insert.
//!
//! [`preview`] and [`inspect`] stop early and persist nothing; they exist
//! for the CLI and for checking a document before spending tokens on it.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::output::{
    ExtractedText, FlashcardDraft, GenerationPrompt, GenerationResult, IngestOutput, IngestStats,
    Inspection, Preview,
};
use crate::pipeline::generate::{resolve_generator, Generator};
use crate::pipeline::input::{self, Document};
use crate::pipeline::persist::{persist_drafts, CardTarget};
use crate::pipeline::{extract, parse};
use crate::progress::{IngestStage, ProgressCallback};
use crate::prompts::{self, DEFAULT_PROMPT_TEMPLATE};
use crate::store::{Card, RowStore};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Turn a PDF on disk into persisted cards.
///
/// # Errors
/// Any stage failing ends the run:
/// - [`IngestError::Extraction`]: unreadable file, not a PDF, bad password
/// - [`IngestError::Generation`]: no provider, or the model call failed
/// - [`IngestError::NoValidFlashcards`]: the completion had no `Q:`/`A:` pairs
/// - [`IngestError::Persist`]: the bulk insert failed
pub async fn ingest(
    path: impl AsRef<Path>,
    target: CardTarget,
    store: &dyn RowStore,
    config: &IngestConfig,
) -> Result<IngestOutput, IngestError> {
    let document = load(path, config).await?;
    ingest_document(document, target, store, config).await
}

/// Same as [`ingest`] for a document already in memory.
pub async fn ingest_document(
    document: Document,
    target: CardTarget,
    store: &dyn RowStore,
    config: &IngestConfig,
) -> Result<IngestOutput, IngestError> {
    let total_start = Instant::now();
    let events = Events::new(config);
    let mut stats = IngestStats::default();
    info!("Starting ingestion: '{}'", document.name);

    // ── Step 1: Resolve the generator before spending time on extraction ──
    let generator = resolve_generator(config).map_err(|e| events.fail(IngestStage::Generate, e))?;

    // ── Step 2: Extract ───────────────────────────────────────────────────
    let extracted = extract_stage(document, config, &events, &mut stats).await?;

    // ── Steps 3-6: Prompt, generate, parse, persist ──────────────────────
    let cards = drafts_to_cards(
        extracted,
        generator,
        target,
        store,
        config,
        &events,
        &mut stats,
    )
    .await?;

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Ingestion complete: {} cards from {} pages, {}ms total",
        cards.len(),
        stats.page_count,
        stats.total_duration_ms
    );
    Ok(IngestOutput { cards, stats })
}

/// Run stages 2-5 on text that is already extracted.
///
/// Text carrying its own `Page N:` markers is counted by page for the quota.
pub async fn ingest_text(
    extracted: ExtractedText,
    target: CardTarget,
    store: &dyn RowStore,
    config: &IngestConfig,
) -> Result<IngestOutput, IngestError> {
    let total_start = Instant::now();
    let events = Events::new(config);
    let mut stats = IngestStats {
        page_count: extracted.page_count(),
        text_chars: extracted.text.chars().count(),
        ..Default::default()
    };

    let generator = resolve_generator(config).map_err(|e| events.fail(IngestStage::Generate, e))?;
    let cards = drafts_to_cards(
        extracted,
        generator,
        target,
        store,
        config,
        &events,
        &mut stats,
    )
    .await?;

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(IngestOutput { cards, stats })
}

/// Extract, prompt, generate and parse a PDF without persisting anything.
///
/// Unlike [`ingest`], zero parsed drafts is not an error here: the raw
/// completion is returned so it can be looked at.
pub async fn preview(
    path: impl AsRef<Path>,
    config: &IngestConfig,
) -> Result<Preview, IngestError> {
    let document = load(path, config).await?;
    preview_document(document, config).await
}

/// Same as [`preview`] for a document already in memory.
pub async fn preview_document(
    document: Document,
    config: &IngestConfig,
) -> Result<Preview, IngestError> {
    let total_start = Instant::now();
    let events = Events::new(config);
    let mut stats = IngestStats::default();

    let generator = resolve_generator(config).map_err(|e| events.fail(IngestStage::Generate, e))?;
    let extracted = extract_stage(document, config, &events, &mut stats).await?;
    let prompt = prompt_stage(&extracted, config, &events, &mut stats);
    let response = generate_stage(generator.as_ref(), &prompt, &events, &mut stats).await?;
    let drafts = parse_stage(&response, &events, &mut stats);

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(Preview {
        prompt,
        response,
        drafts,
        stats,
    })
}

/// Extract a PDF and compute its prompt and quota. No model, no row-store.
pub async fn inspect(
    path: impl AsRef<Path>,
    config: &IngestConfig,
) -> Result<Inspection, IngestError> {
    let total_start = Instant::now();
    let events = Events::new(config);
    let mut stats = IngestStats::default();

    let document = load(path, config).await?;
    let extracted = extract_stage(document, config, &events, &mut stats).await?;
    let prompt = prompt_stage(&extracted, config, &events, &mut stats);

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(Inspection {
        extracted,
        prompt,
        stats,
    })
}

/// Persist cards pasted as `Q:`/`A:` blocks separated by blank lines.
///
/// No model is involved. Zero well-formed blocks is
/// [`IngestError::NoValidFlashcards`] and nothing is inserted.
pub async fn import_text(
    text: &str,
    target: CardTarget,
    store: &dyn RowStore,
) -> Result<Vec<Card>, IngestError> {
    let drafts = parse::parse_bulk_text(text);
    info!("Bulk text: {} well-formed blocks", drafts.len());
    persist_drafts(store, drafts, target).await
}

// ── Stages ───────────────────────────────────────────────────────────────────

async fn load(path: impl AsRef<Path>, config: &IngestConfig) -> Result<Document, IngestError> {
    input::load_document(path)
        .await
        .map_err(|e| IngestError::from(Events::new(config).fail(IngestStage::Extract, e)))
}

async fn extract_stage(
    document: Document,
    config: &IngestConfig,
    events: &Events<'_>,
    stats: &mut IngestStats,
) -> Result<ExtractedText, IngestError> {
    events.start(IngestStage::Extract);
    let start = Instant::now();
    document.check_size_guideline(config.max_document_bytes);

    let extracted = extract::extract_text(document, config)
        .await
        .map_err(|e| events.fail(IngestStage::Extract, e))?;

    stats.extract_duration_ms = start.elapsed().as_millis() as u64;
    stats.page_count = extracted.page_count();
    stats.text_chars = extracted.text.chars().count();
    stats.short_pages = extract::short_pages(&extracted.pages, config.short_page_chars);
    if !stats.short_pages.is_empty() {
        warn!(
            "{} of {} pages have little or no text: {:?}",
            stats.short_pages.len(),
            stats.page_count,
            stats.short_pages
        );
    }

    events.complete(
        IngestStage::Extract,
        &format!(
            "{} pages, {} chars (~{}/page)",
            stats.page_count,
            stats.text_chars,
            stats.average_chars_per_page()
        ),
    );
    Ok(extracted)
}

fn prompt_stage(
    extracted: &ExtractedText,
    config: &IngestConfig,
    events: &Events<'_>,
    stats: &mut IngestStats,
) -> GenerationPrompt {
    events.start(IngestStage::Prompt);
    let template = config
        .prompt_template
        .as_deref()
        .unwrap_or(DEFAULT_PROMPT_TEMPLATE);
    let prompt = prompts::build_prompt_with(extracted, template);

    stats.word_count = prompt.word_count;
    stats.min_cards = prompt.min_cards;
    events.complete(
        IngestStage::Prompt,
        &format!(
            "{} words, {} page markers, at least {} cards",
            prompt.word_count, prompt.page_count, prompt.min_cards
        ),
    );
    prompt
}

async fn generate_stage(
    generator: &dyn Generator,
    prompt: &GenerationPrompt,
    events: &Events<'_>,
    stats: &mut IngestStats,
) -> Result<GenerationResult, IngestError> {
    events.start(IngestStage::Generate);
    let start = Instant::now();

    let response = generator
        .generate(prompt)
        .await
        .map_err(|e| events.fail(IngestStage::Generate, e))?;

    stats.generate_duration_ms = start.elapsed().as_millis() as u64;
    stats.prompt_tokens = response.prompt_tokens;
    stats.completion_tokens = response.completion_tokens;
    events.complete(
        IngestStage::Generate,
        &format!("{} chars in {}ms", response.text.len(), stats.generate_duration_ms),
    );
    Ok(response)
}

fn parse_stage(
    response: &GenerationResult,
    events: &Events<'_>,
    stats: &mut IngestStats,
) -> Vec<FlashcardDraft> {
    events.start(IngestStage::Parse);
    let drafts = parse::parse_flashcards(&response.text);
    stats.parsed_cards = drafts.len();
    if drafts.len() < stats.min_cards {
        info!(
            "Model returned {} cards, below the requested {}",
            drafts.len(),
            stats.min_cards
        );
    }
    events.complete(IngestStage::Parse, &format!("{} cards", drafts.len()));
    drafts
}

async fn drafts_to_cards(
    extracted: ExtractedText,
    generator: Arc<dyn Generator>,
    target: CardTarget,
    store: &dyn RowStore,
    config: &IngestConfig,
    events: &Events<'_>,
    stats: &mut IngestStats,
) -> Result<Vec<Card>, IngestError> {
    let prompt = prompt_stage(&extracted, config, events, stats);
    let response = generate_stage(generator.as_ref(), &prompt, events, stats).await?;
    let drafts = parse_stage(&response, events, stats);
    if drafts.is_empty() {
        return Err(events.fail(IngestStage::Parse, IngestError::NoValidFlashcards));
    }

    events.start(IngestStage::Persist);
    let cards = persist_drafts(store, drafts, target)
        .await
        .map_err(|e| events.fail(IngestStage::Persist, e))?;
    events.complete(IngestStage::Persist, &format!("{} cards", cards.len()));
    Ok(cards)
}

// ── Progress plumbing ────────────────────────────────────────────────────────

/// Forwards stage events to the configured callback, if any.
struct Events<'a> {
    callback: Option<&'a ProgressCallback>,
}

impl<'a> Events<'a> {
    fn new(config: &'a IngestConfig) -> Self {
        Self {
            callback: config.progress_callback.as_ref(),
        }
    }

    fn start(&self, stage: IngestStage) {
        info!("{}", stage);
        if let Some(cb) = self.callback {
            cb.on_stage_start(stage);
        }
    }

    fn complete(&self, stage: IngestStage, detail: &str) {
        info!("{}: {}", stage, detail);
        if let Some(cb) = self.callback {
            cb.on_stage_complete(stage, detail);
        }
    }

    /// Report `error` against `stage` and hand it back for `?`.
    fn fail<E: Display>(&self, stage: IngestStage, error: E) -> E {
        warn!("{} failed: {}", stage, error);
        if let Some(cb) = self.callback {
            cb.on_failure(stage, &error.to_string());
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn target() -> CardTarget {
        CardTarget::new(Uuid::from_u128(20), Uuid::from_u128(2))
    }

    #[tokio::test]
    async fn import_text_saves_blocks() {
        let store = MemoryStore::new();
        let text = "Q: What is React?\nA: A JavaScript library.\n\nQ: What is JSX?\nA: A syntax extension.";

        let cards = import_text(text, target(), &store).await.unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].question, "What is JSX?");
        assert!(cards.iter().all(|c| c.group_id == target().group_id));
    }

    #[tokio::test]
    async fn import_text_without_pairs_is_rejected() {
        let store = MemoryStore::new();
        let err = import_text("just some notes", target(), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::NoValidFlashcards));
        assert!(store.select_cards(target().user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_fails_extraction() {
        let store = MemoryStore::new();
        let err = ingest("/definitely/not/here.pdf", target(), &store, &IngestConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Extraction(ExtractionError::FileNotFound { .. })
        ));
    }
}
