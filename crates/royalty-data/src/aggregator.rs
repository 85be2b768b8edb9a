//! Revenue aggregation over the filtered ledger.
//!
//! Groups revenue records by platform and by track, producing the ordered
//! summaries the report layer renders and the track index that answers
//! cross-platform drill-down queries. Missing revenue values are excluded
//! from every sum.

use std::cmp::Ordering;
use std::collections::HashMap;

use royalty_core::models::RevenueRecord;

// ── PlatformSummary ───────────────────────────────────────────────────────────

/// Revenue aggregate for one platform.
#[derive(Debug, Clone)]
pub struct PlatformSummary {
    /// Platform name (a member of the allow-list).
    pub platform: String,
    /// Sum of net revenue over all of this platform's records.
    pub total_revenue: f64,
    /// Per-track revenue, descending; duplicate titles collapsed into one
    /// summed entry.
    pub track_breakdown: Vec<(String, f64)>,
}

impl PlatformSummary {
    /// This platform's revenue for one track, or `None` when the track has
    /// no entry in the breakdown.
    pub fn revenue_for(&self, track_title: &str) -> Option<f64> {
        self.track_breakdown
            .iter()
            .find(|(title, _)| title == track_title)
            .map(|(_, revenue)| *revenue)
    }
}

// ── TrackRevenueIndex ─────────────────────────────────────────────────────────

/// Per-track totals across all platforms, ranked descending by revenue.
#[derive(Debug, Clone, Default)]
pub struct TrackRevenueIndex {
    /// `(track_title, total_revenue)` pairs, descending by revenue.
    pub ranked: Vec<(String, f64)>,
}

impl TrackRevenueIndex {
    /// Total revenue for one track across all platforms.
    pub fn total_for(&self, track_title: &str) -> Option<f64> {
        self.ranked
            .iter()
            .find(|(title, _)| title == track_title)
            .map(|(_, revenue)| *revenue)
    }

    /// Ranked track titles, highest-earning first.
    pub fn titles(&self) -> Vec<&str> {
        self.ranked.iter().map(|(title, _)| title.as_str()).collect()
    }
}

// ── RevenueSummary ────────────────────────────────────────────────────────────

/// The complete output of [`summarize`].
#[derive(Debug, Clone)]
pub struct RevenueSummary {
    /// One summary per platform with at least one record, descending by
    /// total revenue; ties keep allow-list encounter order.
    pub platforms: Vec<PlatformSummary>,
    /// Per-track totals across all platforms.
    pub track_index: TrackRevenueIndex,
}

impl RevenueSummary {
    /// Sum of all platform totals (equals the sum of all track totals).
    pub fn total_revenue(&self) -> f64 {
        self.platforms.iter().map(|p| p.total_revenue).sum()
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Aggregate filtered revenue records into per-platform and per-track tables.
///
/// Platforms are visited in `allowed` order; those with no records are
/// omitted entirely rather than reported with a zero total. All orderings
/// are stable descending sorts, so equal totals keep encounter order.
pub fn summarize(records: &[RevenueRecord], allowed: &[String]) -> RevenueSummary {
    // Track index across all platforms, first-seen order before ranking.
    let mut track_totals = grouped_totals(records.iter().map(|r| (r.track_title.as_str(), r.net_revenue)));
    sort_descending(&mut track_totals);

    let mut platforms: Vec<PlatformSummary> = Vec::new();
    for platform in allowed {
        let platform_records: Vec<&RevenueRecord> =
            records.iter().filter(|r| &r.platform == platform).collect();
        if platform_records.is_empty() {
            continue;
        }

        let total_revenue: f64 = platform_records
            .iter()
            .filter_map(|r| r.net_revenue)
            .sum();

        let mut track_breakdown = grouped_totals(
            platform_records
                .iter()
                .map(|r| (r.track_title.as_str(), r.net_revenue)),
        );
        sort_descending(&mut track_breakdown);

        platforms.push(PlatformSummary {
            platform: platform.clone(),
            total_revenue,
            track_breakdown,
        });
    }

    // Stable sort keeps allow-list order for equal totals.
    platforms.sort_by(|a, b| compare_descending(a.total_revenue, b.total_revenue));

    RevenueSummary {
        platforms,
        track_index: TrackRevenueIndex { ranked: track_totals },
    }
}

/// Per-platform revenue for one track: entries with revenue > 0 only,
/// descending by revenue. A pure lookup over [`summarize`]'s output.
pub fn revenue_for_track(summaries: &[PlatformSummary], track_title: &str) -> Vec<(String, f64)> {
    let mut entries: Vec<(String, f64)> = summaries
        .iter()
        .filter_map(|s| {
            s.revenue_for(track_title)
                .filter(|revenue| *revenue > 0.0)
                .map(|revenue| (s.platform.clone(), revenue))
        })
        .collect();
    sort_descending(&mut entries);
    entries
}

/// Total revenue for one track restricted to the platforms named in
/// `subset`. Platforms absent from `summaries` contribute 0, not an error.
pub fn revenue_from_platform_subset(
    summaries: &[PlatformSummary],
    track_title: &str,
    subset: &[String],
) -> f64 {
    summaries
        .iter()
        .filter(|s| subset.iter().any(|name| name == &s.platform))
        .filter_map(|s| s.revenue_for(track_title))
        .sum()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Group `(key, value)` pairs by key in first-seen order, summing values and
/// ignoring missing ones. A key whose values are all missing still gets an
/// entry with a 0.0 total.
fn grouped_totals<'a>(pairs: impl Iterator<Item = (&'a str, Option<f64>)>) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (key, value) in pairs {
        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            totals.push((key.to_string(), 0.0));
            totals.len() - 1
        });
        if let Some(v) = value {
            totals[slot].1 += v;
        }
    }

    totals
}

/// Stable descending sort by the numeric component.
fn sort_descending(entries: &mut [(String, f64)]) {
    entries.sort_by(|a, b| compare_descending(a.1, b.1));
}

/// Descending comparison that treats incomparable floats as equal, so the
/// surrounding stable sort leaves their order untouched.
fn compare_descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
