//! Ingestion pipeline tests with a scripted model and an in-memory store.
//!
//! No network and no pdfium: text enters through [`ingest_text`], so these
//! run everywhere.

use async_trait::async_trait;
use flashyy::{
    import_text, ingest_text, CardTarget, ExtractedText, GenerationError, GenerationPrompt,
    GenerationResult, Generator, IngestConfig, IngestError, IngestProgressCallback, IngestStage,
    Library, MemoryStore, PageText, RowStore, StoreError,
};
use flashyy::store::{Card, CardPatch, Group, GroupPatch, NewCard, NewGroup, StoreResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

// ── Test doubles ─────────────────────────────────────────────────────────────

/// Replies with a fixed completion and remembers the prompts it was sent.
struct ScriptedGenerator {
    reply: Result<String, String>,
    prompts: Mutex<Vec<GenerationPrompt>>,
}

impl ScriptedGenerator {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> GenerationPrompt {
        self.prompts.lock().unwrap().last().cloned().expect("no prompt sent")
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &GenerationPrompt,
    ) -> Result<GenerationResult, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        match &self.reply {
            Ok(text) => Ok(GenerationResult {
                text: text.clone(),
                prompt_tokens: 1200,
                completion_tokens: 300,
            }),
            Err(message) => Err(GenerationError::Api {
                message: message.clone(),
            }),
        }
    }
}

/// Counts card inserts; optionally refuses them.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    inserts: AtomicUsize,
    refuse_inserts: bool,
}

#[async_trait]
impl RowStore for CountingStore {
    async fn select_groups(&self, owner: Uuid) -> StoreResult<Vec<Group>> {
        self.inner.select_groups(owner).await
    }
    async fn insert_groups(&self, rows: &[NewGroup]) -> StoreResult<Vec<Group>> {
        self.inner.insert_groups(rows).await
    }
    async fn update_group(&self, owner: Uuid, id: Uuid, patch: &GroupPatch) -> StoreResult<Group> {
        self.inner.update_group(owner, id, patch).await
    }
    async fn delete_group(&self, owner: Uuid, id: Uuid) -> StoreResult<()> {
        self.inner.delete_group(owner, id).await
    }
    async fn select_cards(&self, owner: Uuid) -> StoreResult<Vec<Card>> {
        self.inner.select_cards(owner).await
    }
    async fn insert_cards(&self, rows: &[NewCard]) -> StoreResult<Vec<Card>> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.refuse_inserts {
            return Err(StoreError::Http {
                status: 503,
                body: "service unavailable".into(),
            });
        }
        self.inner.insert_cards(rows).await
    }
    async fn update_card(&self, owner: Uuid, id: Uuid, patch: &CardPatch) -> StoreResult<Card> {
        self.inner.update_card(owner, id, patch).await
    }
    async fn delete_card(&self, owner: Uuid, id: Uuid) -> StoreResult<()> {
        self.inner.delete_card(owner, id).await
    }
    async fn delete_cards_in_group(&self, owner: Uuid, group_id: Uuid) -> StoreResult<usize> {
        self.inner.delete_cards_in_group(owner, group_id).await
    }
}

#[derive(Default)]
struct RecordingCallback {
    events: Mutex<Vec<String>>,
}

impl IngestProgressCallback for RecordingCallback {
    fn on_stage_start(&self, stage: IngestStage) {
        self.events.lock().unwrap().push(format!("start {stage:?}"));
    }

    fn on_failure(&self, stage: IngestStage, _error: &str) {
        self.events.lock().unwrap().push(format!("fail {stage:?}"));
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

const TWO_CARDS: &str = "Q: What is X?\nA: X is Y.\n\nQ: What is Z?\nA: Z is W.";

fn target() -> CardTarget {
    CardTarget::new(Uuid::from_u128(0xA), Uuid::from_u128(0x1))
}

fn config_with(generator: Arc<ScriptedGenerator>) -> IngestConfig {
    IngestConfig::builder()
        .generator(generator)
        .build()
        .unwrap()
}

/// Two pages whose text plus markers totals 1500 whitespace tokens.
fn two_page_document() -> ExtractedText {
    let page = vec!["word"; 748].join(" ");
    ExtractedText::from_pages(vec![PageText::new(1, page.clone()), PageText::new(2, page)])
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn two_page_document_becomes_two_cards() {
    let generator = ScriptedGenerator::replying(TWO_CARDS);
    let store = CountingStore::default();

    let output = assert_ok!(
        ingest_text(two_page_document(), target(), &store, &config_with(generator.clone())).await
    );

    let prompt = generator.last_prompt();
    assert_eq!(prompt.page_count, 2);
    assert_eq!(prompt.word_count, 1500);
    assert_eq!(prompt.min_cards, 60);
    assert!(prompt.text.contains("at least 60"));
    assert!(prompt.text.contains("Page 2:\nword word"));

    let questions: Vec<&str> = output.cards.iter().map(|c| c.question.as_str()).collect();
    assert_eq!(questions, vec!["What is X?", "What is Z?"]);
    assert!(output.cards.iter().all(|c| c.group_id == target().group_id));
    assert!(output.cards.iter().all(|c| c.user_id == target().user_id));

    assert_eq!(output.stats.page_count, 2);
    assert_eq!(output.stats.min_cards, 60);
    assert_eq!(output.stats.parsed_cards, 2);
    assert_eq!(output.stats.prompt_tokens, 1200);
    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn blank_completion_never_reaches_the_store() {
    let generator = ScriptedGenerator::replying("   \n\n  ");
    let store = CountingStore::default();

    let err = assert_err!(
        ingest_text(two_page_document(), target(), &store, &config_with(generator)).await
    );

    assert!(matches!(err, IngestError::NoValidFlashcards));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn model_failure_is_terminal() {
    let generator = ScriptedGenerator::failing("quota exceeded");
    let store = CountingStore::default();
    let recorder = Arc::new(RecordingCallback::default());
    let config = IngestConfig::builder()
        .generator(generator.clone())
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let notes = ExtractedText::from_plain("short notes");
    let err = assert_err!(ingest_text(notes, target(), &store, &config).await);

    assert!(matches!(err, IngestError::Generation(GenerationError::Api { .. })));
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(generator.calls(), 1);
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec!["start Prompt", "start Generate", "fail Generate"]
    );
}

#[tokio::test]
async fn insert_failure_keeps_nothing() {
    let generator = ScriptedGenerator::replying(TWO_CARDS);
    let store = CountingStore {
        refuse_inserts: true,
        ..Default::default()
    };

    let err = assert_err!(
        ingest_text(two_page_document(), target(), &store, &config_with(generator)).await
    );

    assert!(matches!(err, IngestError::Persist(StoreError::Http { status: 503, .. })));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    assert!(store.select_cards(target().user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_text_still_asks_for_twenty() {
    let generator = ScriptedGenerator::replying(TWO_CARDS);
    let store = CountingStore::default();

    let config = config_with(generator.clone());
    assert_ok!(ingest_text(ExtractedText::from_plain(""), target(), &store, &config).await);

    let prompt = generator.last_prompt();
    assert_eq!(prompt.page_count, 0);
    assert_eq!(prompt.min_cards, 20);
    assert!(prompt.text.contains("at least 20"));
}

#[tokio::test]
async fn custom_template_is_used() {
    let generator = ScriptedGenerator::replying(TWO_CARDS);
    let store = CountingStore::default();
    let config = IngestConfig::builder()
        .generator(generator.clone())
        .prompt_template("Make {min_cards} cards from:\n{text}")
        .build()
        .unwrap();

    let notes = ExtractedText::from_plain("Mitochondria make ATP.");
    assert_ok!(ingest_text(notes, target(), &store, &config).await);

    assert_eq!(
        generator.last_prompt().text,
        "Make 20 cards from:\nMitochondria make ATP."
    );
}

#[tokio::test]
async fn bulk_text_goes_through_the_same_boundary() {
    let store = CountingStore::default();

    let cards = assert_ok!(import_text(TWO_CARDS, target(), &store).await);
    assert_eq!(cards.len(), 2);

    let err = assert_err!(import_text("no pairs here", target(), &store).await);
    assert!(matches!(err, IngestError::NoValidFlashcards));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn library_sees_cards_after_reload() {
    let store = Arc::new(MemoryStore::new());
    let user = Uuid::from_u128(0x1);

    let mut library = Library::for_user(store.clone(), user);
    let group = assert_ok!(library.add_group("Cell Biology", Some("sage")).await).id;
    assert_eq!(assert_ok!(library.import_text(TWO_CARDS).await), 2);

    let mut fresh = Library::for_user(store, user);
    assert_ok!(fresh.load().await);
    assert_eq!(fresh.groups().len(), 1);
    assert_eq!(fresh.group_card_count(group), 2);
    assert_eq!(fresh.cards()[0].question, "What is X?");
}
