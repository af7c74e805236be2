//! The signed-in user's groups and cards.
//!
//! [`Library`] is a local cache of the row-store's `groups` and `cards`
//! rows plus the currently selected group. The row-store stays the source
//! of truth: every mutation goes through it, and the cache only changes
//! once the round trip succeeds. Group edits are the one exception: they are
//! applied locally first and rolled back to a snapshot if the store refuses.

use crate::config::IngestConfig;
use crate::error::{LibraryError, StoreError};
use crate::ingest;
use crate::output::IngestOutput;
use crate::pipeline::persist::CardTarget;
use crate::store::{
    group_color, Card, CardPatch, Group, GroupPatch, NewCard, NewGroup, RowStore, Session,
    DEFAULT_GROUP_COLOR,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct Library {
    store: Arc<dyn RowStore>,
    user_id: Uuid,
    groups: Vec<Group>,
    cards: Vec<Card>,
    selected_group: Option<Uuid>,
}

impl Library {
    /// An empty library for `session`'s user. Call [`Library::load`] to fill it.
    pub fn new(store: Arc<dyn RowStore>, session: &Session) -> Self {
        Self::for_user(store, session.user_id)
    }

    pub fn for_user(store: Arc<dyn RowStore>, user_id: Uuid) -> Self {
        Self {
            store,
            user_id,
            groups: Vec::new(),
            cards: Vec::new(),
            selected_group: None,
        }
    }

    /// Replace the cache with the owner's rows, oldest first.
    pub async fn load(&mut self) -> Result<(), LibraryError> {
        let groups = self.store.select_groups(self.user_id).await?;
        let cards = self.store.select_cards(self.user_id).await?;
        debug!("Loaded {} groups, {} cards", groups.len(), cards.len());

        if let Some(id) = self.selected_group {
            if !groups.iter().any(|g| g.id == id) {
                self.selected_group = None;
            }
        }
        self.groups = groups;
        self.cards = cards;
        Ok(())
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn group(&self, id: Uuid) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn card(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn cards_in_group(&self, group_id: Uuid) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.group_id == group_id)
    }

    pub fn group_card_count(&self, group_id: Uuid) -> usize {
        self.cards_in_group(group_id).count()
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn selected_group(&self) -> Option<&Group> {
        self.selected_group.and_then(|id| self.group(id))
    }

    pub fn select_group(&mut self, id: Uuid) -> Result<(), LibraryError> {
        if self.group(id).is_none() {
            return Err(LibraryError::UnknownGroup(id));
        }
        self.selected_group = Some(id);
        Ok(())
    }

    fn target(&self) -> Result<CardTarget, LibraryError> {
        let group_id = self.selected_group.ok_or(LibraryError::NoGroupSelected)?;
        Ok(CardTarget::new(group_id, self.user_id))
    }

    // ── Groups ───────────────────────────────────────────────────────────────

    /// Create a group and select it.
    ///
    /// `color` is a palette name or hex; `None` means the default soft gray.
    pub async fn add_group(
        &mut self,
        name: &str,
        color: Option<&str>,
    ) -> Result<&Group, LibraryError> {
        if name.trim().is_empty() {
            return Err(LibraryError::EmptyGroupName);
        }
        let color = resolve_color(color)?;

        let row = NewGroup {
            name: name.to_string(),
            color: color.to_string(),
            user_id: self.user_id,
        };
        let group = self
            .store
            .insert_groups(std::slice::from_ref(&row))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no group".into()))?;

        info!("Created group '{}' ({})", group.name, group.id);
        self.selected_group = Some(group.id);
        self.groups.push(group);
        Ok(&self.groups[self.groups.len() - 1])
    }

    /// Rename and/or recolour a group.
    ///
    /// The cache is updated before the request. If the store refuses, the
    /// whole group list is restored to what it was before the call.
    pub async fn update_group(&mut self, id: Uuid, patch: GroupPatch) -> Result<(), LibraryError> {
        if let Some(ref name) = patch.name {
            if name.trim().is_empty() {
                return Err(LibraryError::EmptyGroupName);
            }
        }
        let color = match patch.color {
            Some(ref c) => Some(resolve_color(Some(c))?.to_string()),
            None => None,
        };
        let patch = GroupPatch { color, ..patch };

        let snapshot = self.groups.clone();
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(LibraryError::UnknownGroup(id))?;
        patch.apply(group);

        match self.store.update_group(self.user_id, id, &patch).await {
            Ok(stored) => {
                if let Some(g) = self.groups.iter_mut().find(|g| g.id == id) {
                    *g = stored;
                }
                Ok(())
            }
            Err(e) => {
                warn!("Group update failed, restoring previous state: {}", e);
                self.groups = snapshot;
                Err(e.into())
            }
        }
    }

    /// Delete a group's cards, then the group. Clears the selection if it
    /// pointed at this group.
    pub async fn delete_group(&mut self, id: Uuid) -> Result<usize, LibraryError> {
        if self.group(id).is_none() {
            return Err(LibraryError::UnknownGroup(id));
        }

        let removed = self.store.delete_cards_in_group(self.user_id, id).await?;
        self.cards.retain(|c| c.group_id != id);
        self.store.delete_group(self.user_id, id).await?;
        self.groups.retain(|g| g.id != id);

        if self.selected_group == Some(id) {
            self.selected_group = None;
        }
        info!("Deleted group {} and {} cards", id, removed);
        Ok(removed)
    }

    // ── Cards ────────────────────────────────────────────────────────────────

    /// Add one card to the selected group. Both sides must be non-blank;
    /// they are stored as given.
    pub async fn add_card(&mut self, question: &str, answer: &str) -> Result<&Card, LibraryError> {
        if question.trim().is_empty() {
            return Err(LibraryError::EmptyField("question"));
        }
        if answer.trim().is_empty() {
            return Err(LibraryError::EmptyField("answer"));
        }
        let target = self.target()?;

        let row = NewCard {
            question: question.to_string(),
            answer: answer.to_string(),
            group_id: target.group_id,
            user_id: target.user_id,
        };
        let card = self
            .store
            .insert_cards(std::slice::from_ref(&row))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no card".into()))?;

        self.cards.push(card);
        Ok(&self.cards[self.cards.len() - 1])
    }

    /// Add cards pasted as blank-line-separated `Q:`/`A:` blocks to the
    /// selected group. Returns how many were added.
    pub async fn import_text(&mut self, text: &str) -> Result<usize, LibraryError> {
        let target = self.target()?;
        let cards = ingest::import_text(text, target, self.store.as_ref()).await?;
        let added = cards.len();
        self.cards.extend(cards);
        Ok(added)
    }

    /// Generate cards from a PDF into the selected group.
    pub async fn ingest_pdf(
        &mut self,
        path: impl AsRef<Path>,
        config: &IngestConfig,
    ) -> Result<IngestOutput, LibraryError> {
        let target = self.target()?;
        let output = ingest::ingest(path, target, self.store.as_ref(), config).await?;
        self.cards.extend(output.cards.iter().cloned());
        Ok(output)
    }

    pub async fn update_card(&mut self, id: Uuid, patch: CardPatch) -> Result<&Card, LibraryError> {
        let idx = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or(LibraryError::UnknownCard(id))?;
        if let Some(group_id) = patch.group_id {
            if self.group(group_id).is_none() {
                return Err(LibraryError::UnknownGroup(group_id));
            }
        }
        if patch.question.as_deref().is_some_and(|q| q.trim().is_empty()) {
            return Err(LibraryError::EmptyField("question"));
        }
        if patch.answer.as_deref().is_some_and(|a| a.trim().is_empty()) {
            return Err(LibraryError::EmptyField("answer"));
        }

        let stored = self.store.update_card(self.user_id, id, &patch).await?;
        self.cards[idx] = stored;
        Ok(&self.cards[idx])
    }

    pub async fn delete_card(&mut self, id: Uuid) -> Result<(), LibraryError> {
        if self.card(id).is_none() {
            return Err(LibraryError::UnknownCard(id));
        }
        self.store.delete_card(self.user_id, id).await?;
        self.cards.retain(|c| c.id != id);
        Ok(())
    }
}

fn resolve_color(color: Option<&str>) -> Result<&'static str, LibraryError> {
    match color {
        None => Ok(DEFAULT_GROUP_COLOR),
        Some(c) => group_color(c).ok_or_else(|| LibraryError::UnknownColor(c.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Delegates to a [`MemoryStore`] but can be told to refuse updates.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        refuse_updates: AtomicBool,
    }

    #[async_trait]
    impl RowStore for FlakyStore {
        async fn select_groups(&self, owner: Uuid) -> StoreResult<Vec<Group>> {
            self.inner.select_groups(owner).await
        }
        async fn insert_groups(&self, rows: &[NewGroup]) -> StoreResult<Vec<Group>> {
            self.inner.insert_groups(rows).await
        }
        async fn update_group(
            &self,
            owner: Uuid,
            id: Uuid,
            patch: &GroupPatch,
        ) -> StoreResult<Group> {
            if self.refuse_updates.load(Ordering::SeqCst) {
                return Err(StoreError::Http {
                    status: 500,
                    body: "unavailable".into(),
                });
            }
            self.inner.update_group(owner, id, patch).await
        }
        async fn delete_group(&self, owner: Uuid, id: Uuid) -> StoreResult<()> {
            self.inner.delete_group(owner, id).await
        }
        async fn select_cards(&self, owner: Uuid) -> StoreResult<Vec<Card>> {
            self.inner.select_cards(owner).await
        }
        async fn insert_cards(&self, rows: &[NewCard]) -> StoreResult<Vec<Card>> {
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

    fn library() -> (Library, Arc<FlakyStore>) {
        let store = Arc::new(FlakyStore::default());
        let lib = Library::for_user(store.clone(), Uuid::from_u128(1));
        (lib, store)
    }

    #[tokio::test]
    async fn new_group_is_selected_with_default_color() {
        let (mut lib, _) = library();
        let id = lib.add_group("Biology", None).await.unwrap().id;

        assert_eq!(lib.selected_group().map(|g| g.id), Some(id));
        assert_eq!(lib.groups()[0].color, DEFAULT_GROUP_COLOR);
    }

    #[tokio::test]
    async fn blank_group_name_is_refused() {
        let (mut lib, _) = library();
        assert!(matches!(
            lib.add_group("   ", None).await,
            Err(LibraryError::EmptyGroupName)
        ));
        assert!(matches!(
            lib.add_group("Art", Some("ultraviolet")).await,
            Err(LibraryError::UnknownColor(_))
        ));
        assert!(lib.groups().is_empty());
    }

    #[tokio::test]
    async fn cards_need_a_group_and_both_sides() {
        let (mut lib, _) = library();
        assert!(matches!(
            lib.add_card("q", "a").await,
            Err(LibraryError::NoGroupSelected)
        ));

        lib.add_group("Chemistry", None).await.unwrap();
        assert!(matches!(
            lib.add_card("  ", "a").await,
            Err(LibraryError::EmptyField("question"))
        ));
        assert!(matches!(
            lib.add_card("q", "\n").await,
            Err(LibraryError::EmptyField("answer"))
        ));

        let card = lib.add_card(" What is H2O? ", "Water").await.unwrap();
        assert_eq!(card.question, " What is H2O? ");
    }

    #[tokio::test]
    async fn failed_group_update_rolls_back() {
        let (mut lib, store) = library();
        let id = lib.add_group("History", Some("sage")).await.unwrap().id;
        let before = lib.groups().to_vec();

        store.refuse_updates.store(true, Ordering::SeqCst);
        let patch = GroupPatch {
            name: Some("Ancient History".into()),
            color: Some("clay".into()),
        };
        assert!(lib.update_group(id, patch).await.is_err());
        assert_eq!(lib.groups(), before.as_slice());

        store.refuse_updates.store(false, Ordering::SeqCst);
        let patch = GroupPatch {
            name: Some("Ancient History".into()),
            ..Default::default()
        };
        lib.update_group(id, patch).await.unwrap();
        assert_eq!(lib.group(id).unwrap().name, "Ancient History");
        assert_eq!(lib.group(id).unwrap().color, "#E9EFE6");
    }

    #[tokio::test]
    async fn deleting_group_removes_its_cards_and_selection() {
        let (mut lib, store) = library();
        let keep = lib.add_group("Keep", None).await.unwrap().id;
        lib.add_card("k?", "k").await.unwrap();
        let doomed = lib.add_group("Doomed", None).await.unwrap().id;
        lib.add_card("d1?", "d").await.unwrap();
        lib.add_card("d2?", "d").await.unwrap();

        assert_eq!(lib.delete_group(doomed).await.unwrap(), 2);

        assert!(lib.selected_group().is_none());
        assert_eq!(lib.cards().len(), 1);
        assert_eq!(lib.group_card_count(keep), 1);
        let stored = store.select_cards(lib.user_id()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(store.select_groups(lib.user_id()).await.unwrap().iter().all(|g| g.id != doomed));
    }

    #[tokio::test]
    async fn import_text_appends_to_cache() {
        let (mut lib, _) = library();
        lib.add_group("React", None).await.unwrap();

        let added = lib
            .import_text("Q: What is JSX?\nA: Syntax sugar.\n\nQ: Hooks?\nA: Functions.")
            .await
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(lib.cards().len(), 2);
    }

    #[tokio::test]
    async fn card_edits_round_trip() {
        let (mut lib, _) = library();
        lib.add_group("Math", None).await.unwrap();
        let id = lib.add_card("2+2?", "5").await.unwrap().id;

        let patch = CardPatch {
            answer: Some("4".into()),
            ..Default::default()
        };
        assert_eq!(lib.update_card(id, patch).await.unwrap().answer, "4");

        lib.delete_card(id).await.unwrap();
        assert!(lib.cards().is_empty());
        assert!(matches!(
            lib.delete_card(id).await,
            Err(LibraryError::UnknownCard(_))
        ));
    }

    #[tokio::test]
    async fn load_drops_stale_selection() {
        let (mut lib, store) = library();
        let id = lib.add_group("Gone", None).await.unwrap().id;
        store.inner.delete_group(lib.user_id(), id).await.unwrap();

        lib.load().await.unwrap();

        assert!(lib.groups().is_empty());
        assert!(lib.selected_group().is_none());
    }
}
