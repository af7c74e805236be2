//! Row-store port and row types.
//!
//! The hosted backend is the source of truth for `cards` and `groups`. Every
//! read, update, and delete is scoped by the owner's user id; inserts carry
//! the owner inside the row. Two adapters are provided:
//!
//! * [`memory::MemoryStore`]: in-process tables, for tests and offline use.
//! * [`supabase::SupabaseStore`]: PostgREST over HTTPS.

pub mod memory;
pub mod supabase;

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::MemoryStore;
pub use supabase::{SupabaseAuth, SupabaseStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Colour palette for groups, as (name, hex).
pub const GROUP_COLORS: &[(&str, &str)] = &[
    ("softGreen", "#F2FCE2"),
    ("softYellow", "#FEF7CD"),
    ("softOrange", "#FEC6A1"),
    ("softPeach", "#FDE1D3"),
    ("softGray", "#F1F0FB"),
    ("softPurple", "#E5DEFF"),
    ("softPink", "#FFDEE2"),
    ("softBlue", "#D3E4FD"),
    ("neutralGray", "#F3F4F6"),
    ("sage", "#E9EFE6"),
    ("clay", "#F5F0E6"),
    ("terracotta", "#FAE6D9"),
    ("moss", "#EDF2E9"),
    ("wheat", "#F7EDE2"),
    ("coffee", "#F2ECE4"),
    ("forest", "#E8EDDE"),
    ("olive", "#F4F1E8"),
    ("sand", "#F6F0E8"),
    ("stone", "#EDECEA"),
    ("autumn", "#F9EDE4"),
];

/// Colour given to groups created without one.
pub const DEFAULT_GROUP_COLOR: &str = "#F1F0FB";

/// Resolve a palette name (case-insensitive) or a palette hex value.
pub fn group_color(name_or_hex: &str) -> Option<&'static str> {
    let wanted = name_or_hex.trim();
    GROUP_COLORS
        .iter()
        .find(|(name, hex)| name.eq_ignore_ascii_case(wanted) || hex.eq_ignore_ascii_case(wanted))
        .map(|(_, hex)| *hex)
}

/// Authenticated user, as supplied by the session provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// A persisted flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `cards`; id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub question: String,
    pub answer: String,
    pub group_id: Uuid,
    pub user_id: Uuid,
}

/// Partial update for `cards`. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
}

impl CardPatch {
    pub fn apply(&self, card: &mut Card) {
        if let Some(ref q) = self.question {
            card.question = q.clone();
        }
        if let Some(ref a) = self.answer {
            card.answer = a.clone();
        }
        if let Some(g) = self.group_id {
            card.group_id = g;
        }
    }
}

/// A user-defined, coloured category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub color: String,
    pub user_id: Uuid,
}

/// Partial update for `groups`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl GroupPatch {
    pub fn apply(&self, group: &mut Group) {
        if let Some(ref n) = self.name {
            group.name = n.clone();
        }
        if let Some(ref c) = self.color {
            group.color = c.clone();
        }
    }
}

/// CRUD over the `cards` and `groups` tables, scoped by owner.
///
/// Selects return rows ordered by `created_at` ascending. Inserts are
/// all-or-nothing and return the stored rows in input order. Updates and
/// deletes of a row the owner does not have fail with
/// [`StoreError::NotFound`].
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn select_groups(&self, owner: Uuid) -> StoreResult<Vec<Group>>;

    async fn insert_groups(&self, rows: &[NewGroup]) -> StoreResult<Vec<Group>>;

    async fn update_group(&self, owner: Uuid, id: Uuid, patch: &GroupPatch) -> StoreResult<Group>;

    async fn delete_group(&self, owner: Uuid, id: Uuid) -> StoreResult<()>;

    async fn select_cards(&self, owner: Uuid) -> StoreResult<Vec<Card>>;

    async fn insert_cards(&self, rows: &[NewCard]) -> StoreResult<Vec<Card>>;

    async fn update_card(&self, owner: Uuid, id: Uuid, patch: &CardPatch) -> StoreResult<Card>;

    async fn delete_card(&self, owner: Uuid, id: Uuid) -> StoreResult<()>;

    /// Delete every card of one group. Returns how many went.
    async fn delete_cards_in_group(&self, owner: Uuid, group_id: Uuid) -> StoreResult<usize>;
}
