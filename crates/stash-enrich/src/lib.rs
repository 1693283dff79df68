//! # stash-enrich
//!
//! The analysis side of the Stash pipeline: the [`Analyzer`] contract for
//! the external content-analysis collaborator, two implementations
//! ([`HttpAnalyzer`] and the offline [`HeuristicAnalyzer`]), and the
//! concurrency-windowed enrichment sweep ([`sweep::run_sweep`]).
//!
//! Analysis failures are a per-item concern everywhere in this crate:
//! they degrade to pass-through or fallback values and never abort a
//! sweep or a manual add.

pub mod heuristic;
pub mod http;
pub mod sweep;

use async_trait::async_trait;

use stash_core::{ContentAnalysis, Result};

pub use heuristic::HeuristicAnalyzer;
pub use http::HttpAnalyzer;
pub use sweep::{
    needs_analysis, run_sweep, SweepOutcome, SweepProgress, ANALYSIS_WINDOW, MIN_SUMMARY_LEN,
};

/// The external content-analysis collaborator.
///
/// Only the input/output contract matters here; model and prompt
/// mechanics live behind the implementation.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze raw content (a URL or free text) into title, summary,
    /// tags and a type judgement.
    ///
    /// # Errors
    ///
    /// May fail with any [`StashError`](stash_core::StashError); callers
    /// in this crate always recover locally.
    async fn analyze(&self, content: &str) -> Result<ContentAnalysis>;
}

/// Analyze a single item's content, degrading to
/// [`ContentAnalysis::fallback_for`] on any failure. The manual-add and
/// single-item re-analysis paths use this; it cannot fail.
pub async fn analyze_or_fallback(analyzer: &dyn Analyzer, content: &str) -> ContentAnalysis {
    match analyzer.analyze(content).await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(error = %e, "analysis failed, using fallback values");
            ContentAnalysis::fallback_for(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_core::{ItemType, StashError};

    struct FailingAnalyzer;

    #[async_trait]
    impl Analyzer for FailingAnalyzer {
        async fn analyze(&self, _content: &str) -> Result<ContentAnalysis> {
            Err(StashError::Analysis("engine offline".to_string()))
        }
    }

    #[tokio::test]
    async fn single_item_analysis_never_propagates_errors() {
        let analysis = analyze_or_fallback(&FailingAnalyzer, "https://e.com").await;
        assert_eq!(analysis.item_type, ItemType::Link);
        assert_eq!(analysis.title, stash_core::FALLBACK_TITLE);
    }
}
