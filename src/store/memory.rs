//! In-process row-store.

use super::{Card, CardPatch, Group, GroupPatch, NewCard, NewGroup, RowStore, StoreResult};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    groups: Vec<Group>,
    cards: Vec<Card>,
}

/// Rows kept in insertion order, which is also `created_at` order.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Transport("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select_groups(&self, owner: Uuid) -> StoreResult<Vec<Group>> {
        let t = self.lock()?;
        Ok(t.groups.iter().filter(|g| g.user_id == owner).cloned().collect())
    }

    async fn insert_groups(&self, rows: &[NewGroup]) -> StoreResult<Vec<Group>> {
        let mut t = self.lock()?;
        let inserted: Vec<Group> = rows
            .iter()
            .map(|r| Group {
                id: Uuid::new_v4(),
                user_id: r.user_id,
                name: r.name.clone(),
                color: r.color.clone(),
                created_at: Utc::now(),
            })
            .collect();
        t.groups.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update_group(&self, owner: Uuid, id: Uuid, patch: &GroupPatch) -> StoreResult<Group> {
        let mut t = self.lock()?;
        let group = t
            .groups
            .iter_mut()
            .find(|g| g.id == id && g.user_id == owner)
            .ok_or_else(|| StoreError::NotFound {
                table: "groups",
                id: id.to_string(),
            })?;
        patch.apply(group);
        Ok(group.clone())
    }

    async fn delete_group(&self, owner: Uuid, id: Uuid) -> StoreResult<()> {
        let mut t = self.lock()?;
        let before = t.groups.len();
        t.groups.retain(|g| !(g.id == id && g.user_id == owner));
        if t.groups.len() == before {
            return Err(StoreError::NotFound {
                table: "groups",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn select_cards(&self, owner: Uuid) -> StoreResult<Vec<Card>> {
        let t = self.lock()?;
        Ok(t.cards.iter().filter(|c| c.user_id == owner).cloned().collect())
    }

    async fn insert_cards(&self, rows: &[NewCard]) -> StoreResult<Vec<Card>> {
        let mut t = self.lock()?;
        let inserted: Vec<Card> = rows
            .iter()
            .map(|r| Card {
                id: Uuid::new_v4(),
                question: r.question.clone(),
                answer: r.answer.clone(),
                group_id: r.group_id,
                user_id: r.user_id,
                created_at: Utc::now(),
            })
            .collect();
        t.cards.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update_card(&self, owner: Uuid, id: Uuid, patch: &CardPatch) -> StoreResult<Card> {
        let mut t = self.lock()?;
        let card = t
            .cards
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
            .ok_or_else(|| StoreError::NotFound {
                table: "cards",
                id: id.to_string(),
            })?;
        patch.apply(card);
        Ok(card.clone())
    }

    async fn delete_card(&self, owner: Uuid, id: Uuid) -> StoreResult<()> {
        let mut t = self.lock()?;
        let before = t.cards.len();
        t.cards.retain(|c| !(c.id == id && c.user_id == owner));
        if t.cards.len() == before {
            return Err(StoreError::NotFound {
                table: "cards",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_cards_in_group(&self, owner: Uuid, group_id: Uuid) -> StoreResult<usize> {
        let mut t = self.lock()?;
        let before = t.cards.len();
        t.cards
            .retain(|c| !(c.group_id == group_id && c.user_id == owner));
        Ok(before - t.cards.len())
    }
}
