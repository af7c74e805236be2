//! Hosted row-store and auth over HTTPS.
//!
//! Tables are reached through PostgREST at `{url}/rest/v1/{table}`; every
//! request carries the project's `apikey` and the user's bearer token, and
//! every read, update, and delete filters on `user_id=eq.{owner}`. Writes ask
//! for `Prefer: return=representation` so the stored rows come back.

use super::{
    Card, CardPatch, Group, GroupPatch, NewCard, NewGroup, RowStore, Session, StoreResult,
};
use crate::config::BackendConfig;
use crate::error::StoreError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

const CARDS: &str = "cards";
const GROUPS: &str = "groups";

/// PostgREST-backed [`RowStore`].
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    backend: BackendConfig,
    access_token: String,
}

impl SupabaseStore {
    pub fn new(backend: BackendConfig, session: &Session) -> Self {
        Self {
            client: Client::new(),
            backend,
            access_token: session.access_token.clone(),
        }
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.backend.anon_key)
            .bearer_auth(&self.access_token)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        filters: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let mut query: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("order", "created_at.asc".to_string()),
        ];
        query.extend(filters.iter().cloned());

        let req = self.client.get(self.backend.rest_url(table)).query(&query);
        let resp = send(self.authed(req)).await?;
        decode(resp).await
    }

    async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &'static str,
        rows: &[B],
    ) -> StoreResult<Vec<T>> {
        let req = self
            .client
            .post(self.backend.rest_url(table))
            .header("Prefer", "return=representation")
            .json(rows);
        let resp = send(self.authed(req)).await?;
        decode(resp).await
    }

    async fn update<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &'static str,
        owner: Uuid,
        id: Uuid,
        patch: &B,
    ) -> StoreResult<T> {
        let req = self
            .client
            .patch(self.backend.rest_url(table))
            .query(&owned_row_filter(owner, id))
            .header("Prefer", "return=representation")
            .json(patch);
        let resp = send(self.authed(req)).await?;
        let mut rows: Vec<T> = decode(resp).await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound {
                table,
                id: id.to_string(),
            });
        }
        Ok(rows.swap_remove(0))
    }

    /// Delete matching rows and return how many were removed.
    async fn delete(&self, table: &'static str, filters: &[(&str, String)]) -> StoreResult<usize> {
        let req = self
            .client
            .delete(self.backend.rest_url(table))
            .query(filters)
            .header("Prefer", "return=representation");
        let resp = send(self.authed(req)).await?;
        let rows: Vec<serde_json::Value> = decode(resp).await?;
        Ok(rows.len())
    }
}

fn owned_row_filter(owner: Uuid, id: Uuid) -> Vec<(&'static str, String)> {
    vec![("id", format!("eq.{id}")), ("user_id", format!("eq.{owner}"))]
}

fn owner_filter(owner: Uuid) -> Vec<(&'static str, String)> {
    vec![("user_id", format!("eq.{owner}"))]
}

async fn send(req: RequestBuilder) -> StoreResult<Response> {
    let resp = req
        .send()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;
    check_status(resp).await
}

async fn check_status(resp: Response) -> StoreResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(error_for_status(status, body))
}

fn error_for_status(status: StatusCode, body: String) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::Unauthorized { detail: body }
        }
        _ => StoreError::Http {
            status: status.as_u16(),
            body,
        },
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> StoreResult<T> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl RowStore for SupabaseStore {
    async fn select_groups(&self, owner: Uuid) -> StoreResult<Vec<Group>> {
        self.select(GROUPS, &owner_filter(owner)).await
    }

    async fn insert_groups(&self, rows: &[NewGroup]) -> StoreResult<Vec<Group>> {
        self.insert(GROUPS, rows).await
    }

    async fn update_group(&self, owner: Uuid, id: Uuid, patch: &GroupPatch) -> StoreResult<Group> {
        self.update(GROUPS, owner, id, patch).await
    }

    async fn delete_group(&self, owner: Uuid, id: Uuid) -> StoreResult<()> {
        match self.delete(GROUPS, &owned_row_filter(owner, id)).await? {
            0 => Err(StoreError::NotFound {
                table: GROUPS,
                id: id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    async fn select_cards(&self, owner: Uuid) -> StoreResult<Vec<Card>> {
        self.select(CARDS, &owner_filter(owner)).await
    }

    async fn insert_cards(&self, rows: &[NewCard]) -> StoreResult<Vec<Card>> {
        debug!("Inserting {} cards", rows.len());
        self.insert(CARDS, rows).await
    }

    async fn update_card(&self, owner: Uuid, id: Uuid, patch: &CardPatch) -> StoreResult<Card> {
        self.update(CARDS, owner, id, patch).await
    }

    async fn delete_card(&self, owner: Uuid, id: Uuid) -> StoreResult<()> {
        match self.delete(CARDS, &owned_row_filter(owner, id)).await? {
            0 => Err(StoreError::NotFound {
                table: CARDS,
                id: id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    async fn delete_cards_in_group(&self, owner: Uuid, group_id: Uuid) -> StoreResult<usize> {
        let filters = vec![
            ("group_id", format!("eq.{group_id}")),
            ("user_id", format!("eq.{owner}")),
        ];
        self.delete(CARDS, &filters).await
    }
}

// ── Auth ─────────────────────────────────────────────────────────────────

/// Email/password auth against `{url}/auth/v1`.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    backend: BackendConfig,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
struct AuthUser {
    id: Uuid,
    email: Option<String>,
}

impl From<TokenResponse> for Session {
    fn from(t: TokenResponse) -> Self {
        Session {
            user_id: t.user.id,
            email: t.user.email,
            access_token: t.access_token,
        }
    }
}

impl SupabaseAuth {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            backend,
        }
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> StoreResult<Session> {
        let req = self
            .client
            .post(self.backend.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.backend.anon_key)
            .json(&Credentials { email, password });
        let resp = send(req).await?;
        let token: TokenResponse = decode(resp).await?;
        Ok(token.into())
    }

    /// Register a user. Returns `None` when the project requires email
    /// confirmation before a session is issued.
    pub async fn sign_up(&self, email: &str, password: &str) -> StoreResult<Option<Session>> {
        let req = self
            .client
            .post(self.backend.auth_url("signup"))
            .header("apikey", &self.backend.anon_key)
            .json(&Credentials { email, password });
        let resp = send(req).await?;
        let body: serde_json::Value = decode(resp).await?;
        if body.get("access_token").is_none() {
            return Ok(None);
        }
        let token: TokenResponse =
            serde_json::from_value(body).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Some(token.into()))
    }

    /// Revoke the session's refresh tokens. The access token stays valid
    /// until it expires.
    pub async fn sign_out(&self, session: &Session) -> StoreResult<()> {
        send(self.logout_request(session)).await?;
        debug!("Signed out user {}", session.user_id);
        Ok(())
    }

    fn logout_request(&self, session: &Session) -> RequestBuilder {
        self.client
            .post(self.backend.auth_url("logout"))
            .header("apikey", &self.backend.anon_key)
            .bearer_auth(&session.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_scope_by_owner() {
        let owner = Uuid::nil();
        let id = Uuid::from_u128(7);
        let f = owned_row_filter(owner, id);
        assert_eq!(f[0], ("id", format!("eq.{id}")));
        assert_eq!(f[1], ("user_id", format!("eq.{owner}")));
        assert_eq!(owner_filter(owner), vec![("user_id", format!("eq.{owner}"))]);
    }

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, "jwt expired".into()),
            StoreError::Unauthorized { .. }
        ));
        assert!(matches!(
            error_for_status(StatusCode::CONFLICT, "dup".into()),
            StoreError::Http { status: 409, .. }
        ));
    }

    #[test]
    fn logout_posts_bearer_token() {
        let backend = BackendConfig::new("https://proj.supabase.co", "anon").unwrap();
        let session = Session {
            user_id: Uuid::from_u128(1),
            email: None,
            access_token: "tok".into(),
        };

        let req = SupabaseAuth::new(backend.clone())
            .logout_request(&session)
            .build()
            .unwrap();

        assert_eq!(req.method(), reqwest::Method::POST);
        assert_eq!(req.url().as_str(), backend.auth_url("logout"));
        assert_eq!(req.headers()["apikey"], "anon");
        assert_eq!(req.headers()[reqwest::header::AUTHORIZATION], "Bearer tok");
    }

    #[test]
    fn token_response_becomes_session() {
        let json = r#"{
            "access_token": "tok",
            "token_type": "bearer",
            "user": { "id": "00000000-0000-0000-0000-000000000001", "email": "a@b.c" }
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let session: Session = token.into();
        assert_eq!(session.user_id, Uuid::from_u128(1));
        assert_eq!(session.email.as_deref(), Some("a@b.c"));
        assert_eq!(session.access_token, "tok");
    }

    #[test]
    fn card_rows_decode() {
        let json = r#"[{
            "id": "00000000-0000-0000-0000-000000000002",
            "question": "Q",
            "answer": "A",
            "group_id": "00000000-0000-0000-0000-000000000003",
            "user_id": "00000000-0000-0000-0000-000000000001",
            "created_at": "2024-03-01T10:00:00.123456+00:00"
        }]"#;
        let cards: Vec<Card> = serde_json::from_str(json).unwrap();
        assert_eq!(cards[0].group_id, Uuid::from_u128(3));
    }
}
