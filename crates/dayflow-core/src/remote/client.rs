//! Thin typed HTTP wrapper around the hosted backend's row API.
//!
//! All row traffic goes through the generic `select` / `insert` / `update` /
//! `delete` / `rpc` helpers here; the typed per-collection calls live in
//! `collections.rs`. Failures map to [`RemoteError`] with the backend's own
//! message attached, and nothing here retries.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::RemoteError;

/// Insert conflict resolution, sent as a `Prefer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OnConflict {
    /// Plain insert; a duplicate key is a backend error.
    Error,
    /// Ignore duplicates: an existing row makes the insert a no-op that
    /// returns an empty representation.
    Ignore,
}

/// Client for the backend's row, RPC, and object endpoints.
pub struct RemoteClient {
    http: Client,
    base_url: String,
    anon_key: String,
    /// Access token of the signed-in user; anon key is used when absent.
    bearer: RwLock<Option<String>>,
}

impl RemoteClient {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
            anon_key: config.anon_key.clone(),
            bearer: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Use the signed-in user's access token for subsequent requests.
    pub fn set_bearer(&self, token: impl Into<String>) {
        *self.bearer.write().expect("bearer lock poisoned") = Some(token.into());
    }

    /// Drop back to anonymous-key auth (sign-out).
    pub fn clear_bearer(&self) {
        *self.bearer.write().expect("bearer lock poisoned") = None;
    }

    pub(crate) fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .bearer
            .read()
            .expect("bearer lock poisoned")
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());
        req.header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// Read rows matching the query pairs.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        pairs: &[(String, String)],
    ) -> Result<Vec<T>, RemoteError> {
        debug!(table, "select");
        let req = self
            .authed(self.http.request(Method::GET, self.table_url(table)))
            .query(pairs);
        let response = req.send().await?;
        Self::decode_rows(table, response).await
    }

    /// Insert a row and return the persisted representation.
    pub(crate) async fn insert<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &'static str,
        body: &B,
        on_conflict: OnConflict,
    ) -> Result<Vec<T>, RemoteError> {
        debug!(table, "insert");
        let prefer = match on_conflict {
            OnConflict::Error => "return=representation".to_string(),
            OnConflict::Ignore => {
                "return=representation,resolution=ignore-duplicates".to_string()
            }
        };
        let req = self
            .authed(self.http.request(Method::POST, self.table_url(table)))
            .header("Prefer", prefer)
            .json(body);
        let response = req.send().await?;
        Self::decode_rows(table, response).await
    }

    /// Patch rows matching the pairs; returns the updated representations.
    pub(crate) async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &'static str,
        pairs: &[(String, String)],
        body: &B,
    ) -> Result<Vec<T>, RemoteError> {
        debug!(table, "update");
        let req = self
            .authed(self.http.request(Method::PATCH, self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(pairs)
            .json(body);
        let response = req.send().await?;
        Self::decode_rows(table, response).await
    }

    /// Delete rows matching the pairs. Zero matched rows is still success.
    pub(crate) async fn delete(
        &self,
        table: &'static str,
        pairs: &[(String, String)],
    ) -> Result<(), RemoteError> {
        debug!(table, "delete");
        let req = self
            .authed(self.http.request(Method::DELETE, self.table_url(table)))
            .query(pairs);
        let response = req.send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Invoke a server-side procedure by name.
    pub(crate) async fn rpc<T: DeserializeOwned, B: Serialize>(
        &self,
        name: &'static str,
        args: &B,
    ) -> Result<T, RemoteError> {
        debug!(name, "rpc");
        let url = format!("{}/rest/v1/rpc/{name}", self.base_url);
        let req = self
            .authed(self.http.request(Method::POST, url))
            .json(args);
        let response = req.send().await?;
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Decode { table: name, message: e.to_string() })
    }

    async fn decode_rows<T: DeserializeOwned>(
        table: &'static str,
        response: Response,
    ) -> Result<Vec<T>, RemoteError> {
        let response = Self::check_status(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| RemoteError::Decode { table, message: e.to_string() })
    }

    pub(crate) async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
