//! Concurrency-windowed enrichment sweep.
//!
//! Processes a target item set in fixed-size windows: within a window
//! every eligible analysis call runs concurrently; windows themselves run
//! strictly in sequence, bounding the degree of external-service
//! concurrency. Items are returned in input order and progress is
//! reported after each window settles.
//!
//! The sweep is pure with respect to storage: it transforms items and
//! counts outcomes, and the caller batch-writes the result and reloads.
//! Abandoning a sweep between windows therefore leaves nothing
//! half-applied, and a re-run converges through the same eligibility
//! filter.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use stash_core::{VaultItem, FALLBACK_TITLE, GENERIC_TAG};

use crate::Analyzer;

/// Analysis calls in flight at once.
pub const ANALYSIS_WINDOW: usize = 5;

/// Summaries shorter than this are considered not yet annotated.
pub const MIN_SUMMARY_LEN: usize = 10;

/// Live progress after each completed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepProgress {
    pub completed: usize,
    pub total: usize,
}

/// Result of one sweep over a target set.
#[derive(Debug)]
pub struct SweepOutcome {
    /// Every input item, analyzed or passed through, in input order.
    pub items: Vec<VaultItem>,
    /// Items the collaborator successfully analyzed.
    pub analyzed: usize,
    /// Items skipped by the eligibility filter.
    pub passed: usize,
    /// Items whose analysis call failed; passed through unchanged.
    pub failed: usize,
}

/// Should this item be (re-)analyzed?
///
/// Only items that look poorly annotated are sent out: blank or short
/// summary, the generic placeholder tag, or the placeholder title.
pub fn needs_analysis(item: &VaultItem) -> bool {
    item.summary.chars().count() < MIN_SUMMARY_LEN
        || item.tags.iter().any(|t| t == GENERIC_TAG)
        || item.title == FALLBACK_TITLE
}

/// Run one enrichment sweep across `items`.
///
/// `on_progress` fires once per window with cumulative
/// `{completed, total}` counts. Individual call failures never abort the
/// sweep; the affected item passes through unchanged.
pub async fn run_sweep(
    analyzer: Arc<dyn Analyzer>,
    items: Vec<VaultItem>,
    mut on_progress: impl FnMut(SweepProgress),
) -> SweepOutcome {
    let total = items.len();
    let mut outcome = SweepOutcome {
        items: Vec::with_capacity(total),
        analyzed: 0,
        passed: 0,
        failed: 0,
    };

    let mut pending = items.into_iter();
    loop {
        let window: Vec<VaultItem> = pending.by_ref().take(ANALYSIS_WINDOW).collect();
        if window.is_empty() {
            break;
        }

        let settled = join_all(window.into_iter().map(|item| {
            let analyzer = Arc::clone(&analyzer);
            async move { enrich_one(analyzer.as_ref(), item).await }
        }))
        .await;

        for (item, status) in settled {
            match status {
                ItemStatus::Analyzed => outcome.analyzed += 1,
                ItemStatus::Passed => outcome.passed += 1,
                ItemStatus::Failed => outcome.failed += 1,
            }
            outcome.items.push(item);
        }

        let progress = SweepProgress {
            completed: outcome.items.len(),
            total,
        };
        debug!(completed = progress.completed, total, "sweep window settled");
        on_progress(progress);
    }

    info!(
        analyzed = outcome.analyzed,
        passed = outcome.passed,
        failed = outcome.failed,
        "enrichment sweep finished"
    );
    outcome
}

enum ItemStatus {
    Analyzed,
    Passed,
    Failed,
}

async fn enrich_one(analyzer: &dyn Analyzer, mut item: VaultItem) -> (VaultItem, ItemStatus) {
    if !needs_analysis(&item) {
        return (item, ItemStatus::Passed);
    }

    match analyzer.analyze(&item.content).await {
        Ok(analysis) => {
            analysis.apply_to(&mut item);
            (item, ItemStatus::Analyzed)
        }
        Err(e) => {
            warn!(id = %item.id, error = %e, "analysis call failed, passing item through");
            (item, ItemStatus::Failed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stash_core::{ContentAnalysis, ItemType, Result, StashError};
    use tokio::sync::Mutex;

    /// Scripted analyzer: records which contents it saw, fails on request.
    struct ScriptedAnalyzer {
        seen: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_on: Option<&'static str>,
    }

    impl ScriptedAnalyzer {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl Analyzer for ScriptedAnalyzer {
        async fn analyze(&self, content: &str) -> Result<ContentAnalysis> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.seen.lock().await.push(content.to_string());

            // Yield so windowed calls actually overlap.
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on == Some(content) {
                return Err(StashError::Analysis("scripted failure".to_string()));
            }
            Ok(ContentAnalysis {
                title: format!("analyzed {content}"),
                summary: "a generated summary".to_string(),
                tags: vec!["auto".to_string()],
                item_type: ItemType::Link,
            })
        }
    }

    fn bare_item(content: &str) -> VaultItem {
        // Empty summary: always eligible.
        VaultItem::new(ItemType::Link, content, content)
    }

    fn annotated_item(content: &str) -> VaultItem {
        let mut item = VaultItem::new(ItemType::Link, content, "A real title");
        item.summary = "a perfectly good summary".to_string();
        item.tags = vec!["curated".to_string()];
        item
    }

    #[test]
    fn eligibility_filter_matches_annotation_quality() {
        assert!(needs_analysis(&bare_item("http://e.com")));

        let mut short = annotated_item("http://e.com");
        short.summary = "too short".to_string();
        assert!(needs_analysis(&short));

        let mut generic = annotated_item("http://e.com");
        generic.tags.push(GENERIC_TAG.to_string());
        assert!(needs_analysis(&generic));

        let mut placeholder = annotated_item("http://e.com");
        placeholder.title = FALLBACK_TITLE.to_string();
        assert!(needs_analysis(&placeholder));

        assert!(!needs_analysis(&annotated_item("http://e.com")));
    }

    #[tokio::test]
    async fn well_annotated_items_are_never_sent_to_the_analyzer() {
        let analyzer = Arc::new(ScriptedAnalyzer::new(None));
        let items = vec![annotated_item("http://a.com"), bare_item("http://b.com")];

        let outcome = run_sweep(analyzer.clone(), items, |_| {}).await;
        assert_eq!(outcome.passed, 1);
        assert_eq!(outcome.analyzed, 1);
        assert_eq!(*analyzer.seen.lock().await, vec!["http://b.com"]);
    }

    #[tokio::test]
    async fn one_failed_call_does_not_fail_the_window() {
        let analyzer = Arc::new(ScriptedAnalyzer::new(Some("http://bad.com")));
        let items = vec![
            bare_item("http://good.com"),
            bare_item("http://bad.com"),
            bare_item("http://also-good.com"),
        ];

        let outcome = run_sweep(analyzer, items, |_| {}).await;
        assert_eq!(outcome.analyzed, 2);
        assert_eq!(outcome.failed, 1);

        // The failed item passed through unchanged.
        let bad = outcome
            .items
            .iter()
            .find(|i| i.content == "http://bad.com")
            .unwrap();
        assert_eq!(bad.title, "http://bad.com");
        assert!(bad.summary.is_empty());
    }

    #[tokio::test]
    async fn output_preserves_input_order() {
        let analyzer = Arc::new(ScriptedAnalyzer::new(None));
        let items: Vec<VaultItem> = (0..12).map(|i| bare_item(&format!("http://{i}.com"))).collect();
        let expected: Vec<String> = items.iter().map(|i| i.content.clone()).collect();

        let outcome = run_sweep(analyzer, items, |_| {}).await;
        let got: Vec<String> = outcome.items.iter().map(|i| i.content.clone()).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn progress_is_cumulative_per_window() {
        let analyzer = Arc::new(ScriptedAnalyzer::new(None));
        let items: Vec<VaultItem> = (0..12).map(|i| bare_item(&format!("http://{i}.com"))).collect();

        let mut reports = Vec::new();
        let outcome = run_sweep(analyzer, items, |p| reports.push(p)).await;

        assert_eq!(
            reports,
            vec![
                SweepProgress { completed: 5, total: 12 },
                SweepProgress { completed: 10, total: 12 },
                SweepProgress { completed: 12, total: 12 },
            ]
        );
        assert_eq!(outcome.items.len(), 12);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_the_window_size() {
        let analyzer = Arc::new(ScriptedAnalyzer::new(None));
        let items: Vec<VaultItem> = (0..23).map(|i| bare_item(&format!("http://{i}.com"))).collect();

        run_sweep(analyzer.clone(), items, |_| {}).await;
        assert!(analyzer.max_in_flight.load(Ordering::SeqCst) <= ANALYSIS_WINDOW);
    }

    #[tokio::test]
    async fn empty_target_set_finishes_without_progress() {
        let analyzer = Arc::new(ScriptedAnalyzer::new(None));
        let mut reports = Vec::new();
        let outcome = run_sweep(analyzer, Vec::new(), |p| reports.push(p)).await;
        assert!(outcome.items.is_empty());
        assert!(reports.is_empty());
    }
}
