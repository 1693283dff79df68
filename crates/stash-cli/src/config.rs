//! CLI configuration: a small TOML file, overridable by flags.
//!
//! ```toml
//! # stash.toml
//! store = "https://vault.example.workers.dev"   # or a local .json path
//! token = "secret"
//! analyzer_url = "https://analyze.example.dev"
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use stash_enrich::{Analyzer, HeuristicAnalyzer, HttpAnalyzer};
use stash_store::{HttpStore, JsonFileStore, Store};

/// Default local vault when neither flag nor config names a store.
pub const DEFAULT_STORE: &str = "stash.json";

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "stash.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub store: Option<String>,
    pub token: Option<String>,
    pub analyzer_url: Option<String>,
}

impl Config {
    /// Load from `path`, or from `stash.toml` if present, or defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG));
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Open the store named by `spec`: a URL gets the HTTP backend, anything
/// else is treated as a local JSON file path.
pub fn open_store(spec: &str, token: Option<String>) -> anyhow::Result<Arc<dyn Store>> {
    if spec.starts_with("http://") || spec.starts_with("https://") {
        let store = HttpStore::new(spec, token).context("building HTTP store client")?;
        Ok(Arc::new(store))
    } else {
        Ok(Arc::new(JsonFileStore::new(spec)))
    }
}

/// Pick the analyzer: remote when an endpoint is configured, offline
/// heuristics otherwise.
pub fn open_analyzer(
    analyzer_url: Option<&str>,
    token: Option<String>,
) -> anyhow::Result<Arc<dyn Analyzer>> {
    match analyzer_url {
        Some(url) => {
            let analyzer = HttpAnalyzer::new(url, token).context("building analyzer client")?;
            Ok(Arc::new(analyzer))
        }
        None => Ok(Arc::new(HeuristicAnalyzer::new())),
    }
}
