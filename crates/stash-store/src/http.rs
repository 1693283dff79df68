//! Remote store backend: a key-value worker reachable over HTTP.
//!
//! Endpoints:
//! - `GET    {base}/items`       — full corpus
//! - `PUT    {base}/items/{id}`  — upsert one item
//! - `POST   {base}/items/batch` — upsert a batch
//! - `DELETE {base}/items/{id}`  — delete one item
//!
//! Requests carry `Authorization: Bearer <token>` when a token is
//! configured. Any transport failure or non-2xx status surfaces as
//! [`StashError::Transport`]; retry is the caller's decision.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use stash_core::{Result, StashError, VaultItem};

use crate::Store;

/// Default timeout for store requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Store backed by the remote KV worker.
pub struct HttpStore {
    client: Client,
    base: String,
    token: Option<String>,
}

impl HttpStore {
    /// Build a client for the worker at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`StashError::Transport`] if the HTTP client cannot be
    /// constructed.
    pub fn new(base: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| StashError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_ok(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .authed(builder)
            .send()
            .await
            .map_err(|e| StashError::Transport(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| StashError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Store for HttpStore {
    async fn get_all(&self) -> Result<Vec<VaultItem>> {
        let response = self.send_ok(self.client.get(self.url("items"))).await?;
        response
            .json::<Vec<VaultItem>>()
            .await
            .map_err(|e| StashError::Transport(e.to_string()))
    }

    async fn put(&self, item: &VaultItem) -> Result<()> {
        let url = self.url(&format!("items/{}", item.id));
        self.send_ok(self.client.put(url).json(item)).await?;
        Ok(())
    }

    async fn put_batch(&self, items: &[VaultItem]) -> Result<()> {
        let url = self.url("items/batch");
        self.send_ok(self.client.post(url).json(&items)).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.url(&format!("items/{id}"));
        self.send_ok(self.client.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = HttpStore::new("https://vault.example.workers.dev/", None).unwrap();
        assert_eq!(
            store.url("items/batch"),
            "https://vault.example.workers.dev/items/batch"
        );
    }
}
