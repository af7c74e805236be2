//! Bulk persist: hand parsed drafts to the row-store in one insert.
//!
//! The batch is all-or-nothing from the caller's point of view. An insert
//! failure is returned as-is and no rows are kept locally.

use crate::error::IngestError;
use crate::output::FlashcardDraft;
use crate::store::{Card, NewCard, RowStore};
use tracing::info;
use uuid::Uuid;

/// Where persisted cards land: the active group, owned by the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardTarget {
    pub group_id: Uuid,
    pub user_id: Uuid,
}

impl CardTarget {
    pub fn new(group_id: Uuid, user_id: Uuid) -> Self {
        Self { group_id, user_id }
    }

    fn stamp(&self, draft: FlashcardDraft) -> NewCard {
        NewCard {
            question: draft.question,
            answer: draft.answer,
            group_id: self.group_id,
            user_id: self.user_id,
        }
    }
}

/// Insert one card per draft, stamped with `target`.
///
/// An empty draft list is [`IngestError::NoValidFlashcards`] and the store
/// is never called.
pub async fn persist_drafts(
    store: &dyn RowStore,
    drafts: Vec<FlashcardDraft>,
    target: CardTarget,
) -> Result<Vec<Card>, IngestError> {
    if drafts.is_empty() {
        return Err(IngestError::NoValidFlashcards);
    }

    let rows: Vec<NewCard> = drafts.into_iter().map(|d| target.stamp(d)).collect();
    let cards = store.insert_cards(&rows).await?;

    info!(
        "Saved {} flashcards to group {}",
        cards.len(),
        target.group_id
    );
    Ok(cards)
}
