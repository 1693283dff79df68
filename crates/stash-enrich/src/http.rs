//! Remote analyzer client.
//!
//! Talks to an analysis endpoint that accepts `{"content": "..."}` and
//! answers with the [`ContentAnalysis`] wire shape
//! (`{title, summary, tags, type}`). The engine behind the endpoint is
//! out of scope here; errors surface as
//! [`StashError::Analysis`](stash_core::StashError::Analysis) and are
//! recovered by the callers in this crate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use stash_core::{ContentAnalysis, Result, StashError};

use crate::Analyzer;

/// Analysis calls can be slow; give the engine room to think.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Content sent per call is capped, mirroring the engine's input limit.
const CONTENT_CAP: usize = 5000;

/// Analyzer backed by a remote HTTP endpoint.
pub struct HttpAnalyzer {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpAnalyzer {
    /// Build a client for the engine at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`StashError::Analysis`] if the HTTP client cannot be
    /// constructed.
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| StashError::Analysis(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, content: &str) -> Result<ContentAnalysis> {
        let capped: String = content.chars().take(CONTENT_CAP).collect();

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "content": capped }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StashError::Analysis(e.to_string()))?
            .error_for_status()
            .map_err(|e| StashError::Analysis(e.to_string()))?;

        response
            .json::<ContentAnalysis>()
            .await
            .map_err(|e| StashError::Analysis(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_wire_shape_deserializes() {
        let raw = r#"{
            "title": "Example",
            "summary": "A site about examples.",
            "tags": ["web", "reference"],
            "type": "link"
        }"#;
        let analysis: ContentAnalysis = serde_json::from_str(raw).unwrap();
        assert_eq!(analysis.title, "Example");
        assert_eq!(analysis.tags.len(), 2);
    }
}
