//! View aggregation per channel and proportional revenue attribution.
//!
//! The resolution step merges catalog responses against an id → views map
//! built once from the export, keyed by content id rather than row
//! position, so duplicate ids cannot be credited twice. Batch-level lookup
//! failures are recorded in the result instead of silently shrinking the
//! totals.

use std::collections::HashMap;

use royalty_core::error::{Result, RoyaltyError};
use royalty_core::models::{ChannelShare, ViewsExport};
use tracing::warn;

use crate::resolver::{ChannelResolver, MAX_BATCH_SIZE};

// ── ResolvedViews ─────────────────────────────────────────────────────────────

/// The outcome of a channel-resolution run, including its failures.
#[derive(Debug, Clone, Default)]
pub struct ResolvedViews {
    /// Views per channel in first-resolved order.
    pub channel_views: Vec<(String, u64)>,
    /// Views attached to ids that resolved successfully.
    pub resolved_views: u64,
    /// Distinct ids that could not be resolved, in input order: every id of
    /// a failed batch plus ids a successful response did not mention.
    pub unresolved_ids: Vec<String>,
    /// Number of batches whose lookup failed outright.
    pub failed_batches: usize,
}

impl ResolvedViews {
    /// `true` when every distinct id resolved successfully.
    pub fn is_complete(&self) -> bool {
        self.unresolved_ids.is_empty()
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Resolve every content id of `export` to its owning channel and aggregate
/// views per channel.
///
/// Duplicate content ids are merged (views summed) before resolution, so
/// each row's views are credited exactly once. Ids are looked up in batches
/// of at most [`MAX_BATCH_SIZE`]; a failed batch is recorded and skipped,
/// never fatal. `progress` receives `completed_batches / total_batches`
/// after each batch; it is advisory only.
pub async fn resolve_channel_views<R: ChannelResolver>(
    resolver: &R,
    export: &ViewsExport,
    mut progress: impl FnMut(f64),
) -> ResolvedViews {
    // id → views, first-seen order, duplicates summed.
    let mut ids: Vec<String> = Vec::new();
    let mut views_by_id: HashMap<String, u64> = HashMap::new();
    for row in &export.rows {
        if !views_by_id.contains_key(&row.content_id) {
            ids.push(row.content_id.clone());
        }
        *views_by_id.entry(row.content_id.clone()).or_insert(0) += row.view_count;
    }

    let mut result = ResolvedViews::default();
    if ids.is_empty() {
        return result;
    }

    let batches: Vec<&[String]> = ids.chunks(MAX_BATCH_SIZE).collect();
    let total_batches = batches.len();

    let mut channel_index: HashMap<String, usize> = HashMap::new();
    let mut resolved_ids: std::collections::HashSet<String> = std::collections::HashSet::new();

    for (batch_no, batch) in batches.into_iter().enumerate() {
        match resolver.resolve_batch(batch).await {
            Ok(items) => {
                for item in items {
                    let Some(view_count) = views_by_id.get(&item.content_id).copied() else {
                        warn!(content_id = %item.content_id, "catalog returned an id absent from the export");
                        continue;
                    };
                    if !resolved_ids.insert(item.content_id.clone()) {
                        // The catalog echoed the same id twice; count it once.
                        continue;
                    }

                    let slot = *channel_index.entry(item.channel.clone()).or_insert_with(|| {
                        result.channel_views.push((item.channel.clone(), 0));
                        result.channel_views.len() - 1
                    });
                    result.channel_views[slot].1 += view_count;
                    result.resolved_views += view_count;
                }
            }
            Err(e) => {
                result.failed_batches += 1;
                warn!(batch = batch_no + 1, total_batches, error = %e, "channel lookup batch failed");
            }
        }

        progress((batch_no + 1) as f64 / total_batches as f64);
    }

    result.unresolved_ids = ids
        .iter()
        .filter(|id| !resolved_ids.contains(*id))
        .cloned()
        .collect();

    result
}

// ── Attribution ───────────────────────────────────────────────────────────────

/// Convert per-channel views into a proportional revenue split.
///
/// Each channel's share is its view count over `grand_total_views` (the
/// export's declared total, not the resolved subset), so the shares of a
/// partially resolved run sum to less than one. Fails when the grand total
/// is zero; the revenue tables upstream remain usable.
pub fn attribute_revenue(
    resolved: &ResolvedViews,
    grand_total_views: u64,
    revenue_to_distribute: f64,
) -> Result<Vec<ChannelShare>> {
    if grand_total_views == 0 {
        return Err(RoyaltyError::ZeroTotalViews);
    }

    let mut shares: Vec<ChannelShare> = resolved
        .channel_views
        .iter()
        .map(|(channel, view_count)| {
            let view_share = *view_count as f64 / grand_total_views as f64;
            ChannelShare {
                channel: channel.clone(),
                view_count: *view_count,
                view_share,
                attributed_revenue: view_share * revenue_to_distribute,
            }
        })
        .collect();

    // Stable descending by views (equivalently by share: constant divisor).
    shares.sort_by(|a, b| b.view_count.cmp(&a.view_count));

    Ok(shares)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolvedChannel;
    use royalty_core::models::ViewRow;
    use std::cell::RefCell;

    // ── Mock resolver ─────────────────────────────────────────────────────────

    /// Resolves from a fixed id → channel table; optionally fails selected
    /// batch calls (0-based call index).
    struct MockResolver {
        channels: HashMap<String, String>,
        fail_calls: Vec<usize>,
        calls: RefCell<usize>,
    }

    impl MockResolver {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                channels: pairs
                    .iter()
                    .map(|(id, ch)| (id.to_string(), ch.to_string()))
                    .collect(),
                fail_calls: Vec::new(),
                calls: RefCell::new(0),
            }
        }

        fn failing_on(mut self, calls: &[usize]) -> Self {
            self.fail_calls = calls.to_vec();
            self
        }
    }

    impl ChannelResolver for MockResolver {
        async fn resolve_batch(&self, ids: &[String]) -> Result<Vec<ResolvedChannel>> {
            let call = *self.calls.borrow();
            *self.calls.borrow_mut() += 1;

            if self.fail_calls.contains(&call) {
                return Err(RoyaltyError::Lookup("mock batch failure".to_string()));
            }

            Ok(ids
                .iter()
                .filter_map(|id| {
                    self.channels.get(id).map(|channel| ResolvedChannel {
                        content_id: id.clone(),
                        channel: channel.clone(),
                    })
                })
                .collect())
        }
    }

    fn export(total: u64, rows: &[(&str, u64)]) -> ViewsExport {
        ViewsExport {
            total_views: total,
            rows: rows
                .iter()
                .map(|(id, views)| ViewRow {
                    content_id: id.to_string(),
                    view_count: *views,
                })
                .collect(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    // ── resolve_channel_views ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_resolve_aggregates_views_per_channel() {
        let resolver =
            MockResolver::new(&[("vid-a", "Channel A"), ("vid-b", "Channel A"), ("vid-c", "B")]);
        let export = export(1_000, &[("vid-a", 300), ("vid-b", 300), ("vid-c", 400)]);

        let resolved = resolve_channel_views(&resolver, &export, |_| {}).await;

        assert_eq!(
            resolved.channel_views,
            vec![("Channel A".to_string(), 600), ("B".to_string(), 400)]
        );
        assert_eq!(resolved.resolved_views, 1_000);
        assert!(resolved.is_complete());
        assert_eq!(resolved.failed_batches, 0);
    }

    #[tokio::test]
    async fn test_resolve_duplicate_ids_merged_once() {
        let resolver = MockResolver::new(&[("vid-a", "Channel A")]);
        // The same id appears twice; its views must be summed and credited
        // exactly once.
        let export = export(1_000, &[("vid-a", 300), ("vid-a", 200)]);

        let resolved = resolve_channel_views(&resolver, &export, |_| {}).await;

        assert_eq!(resolved.channel_views, vec![("Channel A".to_string(), 500)]);
        assert_eq!(resolved.resolved_views, 500);
    }

    #[tokio::test]
    async fn test_resolve_failed_batch_recorded_not_fatal() {
        // 60 distinct ids → two batches (50 + 10); fail the first call.
        let pairs: Vec<(String, String)> = (0..60)
            .map(|i| (format!("vid-{i:02}"), "Channel A".to_string()))
            .collect();
        let pair_refs: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(id, ch)| (id.as_str(), ch.as_str()))
            .collect();
        let resolver = MockResolver::new(&pair_refs).failing_on(&[0]);

        let rows: Vec<(String, u64)> = (0..60).map(|i| (format!("vid-{i:02}"), 10)).collect();
        let row_refs: Vec<(&str, u64)> = rows.iter().map(|(id, v)| (id.as_str(), *v)).collect();
        let views = export(600, &row_refs);

        let resolved = resolve_channel_views(&resolver, &views, |_| {}).await;

        assert_eq!(resolved.failed_batches, 1);
        // The 50 ids of the failed batch are reported unresolved.
        assert_eq!(resolved.unresolved_ids.len(), 50);
        assert_eq!(resolved.unresolved_ids[0], "vid-00");
        // Only the second batch's views were credited.
        assert_eq!(resolved.resolved_views, 100);
        assert_eq!(resolved.channel_views, vec![("Channel A".to_string(), 100)]);
    }

    #[tokio::test]
    async fn test_resolve_id_omitted_from_response_is_unresolved() {
        // "vid-gone" is unknown to the catalog (deleted video).
        let resolver = MockResolver::new(&[("vid-a", "Channel A")]);
        let export = export(1_000, &[("vid-a", 600), ("vid-gone", 400)]);

        let resolved = resolve_channel_views(&resolver, &export, |_| {}).await;

        assert_eq!(resolved.unresolved_ids, vec!["vid-gone".to_string()]);
        assert_eq!(resolved.resolved_views, 600);
        assert!(!resolved.is_complete());
    }

    #[tokio::test]
    async fn test_resolve_progress_fractions() {
        let pairs: Vec<(String, String)> = (0..60)
            .map(|i| (format!("vid-{i:02}"), "Ch".to_string()))
            .collect();
        let pair_refs: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(id, ch)| (id.as_str(), ch.as_str()))
            .collect();
        let resolver = MockResolver::new(&pair_refs);

        let rows: Vec<(String, u64)> = (0..60).map(|i| (format!("vid-{i:02}"), 1)).collect();
        let row_refs: Vec<(&str, u64)> = rows.iter().map(|(id, v)| (id.as_str(), *v)).collect();
        let views = export(60, &row_refs);

        let mut fractions: Vec<f64> = Vec::new();
        let _ = resolve_channel_views(&resolver, &views, |f| fractions.push(f)).await;

        assert_eq!(fractions.len(), 2);
        assert_close(fractions[0], 0.5);
        assert_close(fractions[1], 1.0);
    }

    #[tokio::test]
    async fn test_resolve_empty_export() {
        let resolver = MockResolver::new(&[]);
        let views = export(0, &[]);

        let resolved = resolve_channel_views(&resolver, &views, |_| {
            panic!("no batches, no progress")
        })
        .await;

        assert!(resolved.channel_views.is_empty());
        assert!(resolved.is_complete());
    }

    // ── attribute_revenue ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_attribution_end_to_end_scenario() {
        let resolver = MockResolver::new(&[("vid-a", "A"), ("vid-b", "B")]);
        let views = export(1_000, &[("vid-a", 600), ("vid-b", 400)]);

        let resolved = resolve_channel_views(&resolver, &views, |_| {}).await;
        let shares = attribute_revenue(&resolved, views.total_views, 100.0).unwrap();

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].channel, "A");
        assert_close(shares[0].view_share, 0.6);
        assert_close(shares[0].attributed_revenue, 60.0);
        assert_eq!(shares[1].channel, "B");
        assert_close(shares[1].attributed_revenue, 40.0);
    }

    #[test]
    fn test_attribution_zero_grand_total_fails() {
        let resolved = ResolvedViews {
            channel_views: vec![("A".to_string(), 10)],
            resolved_views: 10,
            unresolved_ids: vec![],
            failed_batches: 0,
        };
        let err = attribute_revenue(&resolved, 0, 100.0).unwrap_err();
        assert!(matches!(err, RoyaltyError::ZeroTotalViews));
    }

    #[test]
    fn test_attribution_sum_matches_resolved_fraction() {
        // 700 of 1000 views resolved: attributed revenue sums to 70% of the
        // amount being distributed, never more.
        let resolved = ResolvedViews {
            channel_views: vec![("A".to_string(), 500), ("B".to_string(), 200)],
            resolved_views: 700,
            unresolved_ids: vec!["vid-x".to_string()],
            failed_batches: 0,
        };
        let shares = attribute_revenue(&resolved, 1_000, 50.0).unwrap();

        let total_attributed: f64 = shares.iter().map(|s| s.attributed_revenue).sum();
        assert_close(total_attributed, 50.0 * 700.0 / 1_000.0);

        let share_sum: f64 = shares.iter().map(|s| s.view_share).sum();
        assert!(share_sum <= 1.0);
    }

    #[test]
    fn test_attribution_sorted_descending_by_share() {
        let resolved = ResolvedViews {
            channel_views: vec![
                ("Small".to_string(), 10),
                ("Big".to_string(), 900),
                ("Mid".to_string(), 90),
            ],
            resolved_views: 1_000,
            unresolved_ids: vec![],
            failed_batches: 0,
        };
        let shares = attribute_revenue(&resolved, 1_000, 10.0).unwrap();

        let order: Vec<&str> = shares.iter().map(|s| s.channel.as_str()).collect();
        assert_eq!(order, vec!["Big", "Mid", "Small"]);
    }

    #[test]
    fn test_attribution_tie_keeps_first_resolved_order() {
        let resolved = ResolvedViews {
            channel_views: vec![("First".to_string(), 50), ("Second".to_string(), 50)],
            resolved_views: 100,
            unresolved_ids: vec![],
            failed_batches: 0,
        };
        let shares = attribute_revenue(&resolved, 100, 1.0).unwrap();
        assert_eq!(shares[0].channel, "First");
        assert_eq!(shares[1].channel, "Second");
    }
}
