//! Offline analyzer: cheap heuristics instead of a remote engine.
//!
//! Used when no analysis endpoint is configured. The judgements are
//! deliberately shallow — a type guess, a title from the URL host or
//! first text line, a truncated summary — but they satisfy the same
//! contract as the remote collaborator and never fail.

use async_trait::async_trait;

use stash_core::{ContentAnalysis, ItemType, Result, FALLBACK_TITLE, GENERIC_TAG};

use crate::Analyzer;

const SUMMARY_CAP: usize = 160;

/// Analyzer that derives everything from the content itself.
#[derive(Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Analyzer for HeuristicAnalyzer {
    async fn analyze(&self, content: &str) -> Result<ContentAnalysis> {
        let item_type = guess_type(content);
        let title = match item_type {
            ItemType::Link => host_of(content)
                .unwrap_or(FALLBACK_TITLE)
                .to_string(),
            _ => first_line(content),
        };

        let summary: String = content.chars().take(SUMMARY_CAP).collect();

        Ok(ContentAnalysis {
            title,
            summary,
            tags: vec![GENERIC_TAG.to_string()],
            item_type,
        })
    }
}

fn guess_type(content: &str) -> ItemType {
    if content.starts_with("http://") || content.starts_with("https://") {
        ItemType::Link
    } else if looks_like_code(content) {
        ItemType::Snippet
    } else {
        ItemType::Note
    }
}

fn looks_like_code(content: &str) -> bool {
    let braces = content.matches(['{', '}', ';']).count();
    content.lines().count() > 1 && braces >= 2
}

fn host_of(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?;
    (!host.is_empty()).then_some(host)
}

fn first_line(content: &str) -> String {
    let line = content.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        line.chars().take(80).collect()
    }
}
