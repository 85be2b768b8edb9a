//! Plain-text report rendering.
//!
//! Every renderer writes into an `io::Write` sink so tests can capture the
//! output into a buffer; `main` hands them stdout.

use std::io::Write;

use royalty_attrib::attribution::ResolvedViews;
use royalty_core::formatting::{abbreviate_count, format_currency, percentage};
use royalty_core::models::ChannelShare;
use royalty_data::aggregator::RevenueSummary;
use royalty_data::ledger::LedgerStats;

// ── Revenue overview ──────────────────────────────────────────────────────────

/// Render the per-platform tables, the cross-platform track ranking and the
/// load-stats footer.
pub fn render_overview(
    out: &mut impl Write,
    summary: &RevenueSummary,
    stats: &LedgerStats,
) -> std::io::Result<()> {
    writeln!(out, "Revenue by platform")?;
    writeln!(out, "===================")?;
    for platform in &summary.platforms {
        writeln!(out)?;
        writeln!(
            out,
            "{}  —  {}",
            platform.platform,
            format_currency(platform.total_revenue)
        )?;
        for (track, revenue) in &platform.track_breakdown {
            writeln!(out, "  {:<50} {:>12}", track, format_currency(*revenue))?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Tracks across all platforms")?;
    writeln!(out, "===========================")?;
    for (rank, (track, revenue)) in summary.track_index.ranked.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {:<50} {:>12}",
            rank + 1,
            track,
            format_currency(*revenue)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Total revenue: {}", format_currency(summary.total_revenue()))?;
    writeln!(
        out,
        "Rows: {} read, {} kept, {} without a parseable revenue value",
        stats.rows_read, stats.rows_kept, stats.missing_revenue_values
    )?;
    writeln!(
        out,
        "Loaded in {:.2}s at {}",
        stats.load_time_seconds, stats.generated_at
    )?;

    Ok(())
}

// ── Track drill-down ──────────────────────────────────────────────────────────

/// Render one track's revenue per platform plus the amount earmarked for
/// channel distribution.
pub fn render_track_drilldown(
    out: &mut impl Write,
    track: &str,
    per_platform: &[(String, f64)],
    total: f64,
    distributable: f64,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Track: {}", track)?;
    writeln!(out, "{}", "-".repeat(7 + track.len()))?;

    if per_platform.is_empty() {
        writeln!(out, "No revenue recorded on any allow-listed platform.")?;
        return Ok(());
    }

    for (platform, revenue) in per_platform {
        writeln!(out, "  {:<45} {:>12}", platform, format_currency(*revenue))?;
    }
    writeln!(out, "  {:<45} {:>12}", "Total", format_currency(total))?;
    writeln!(
        out,
        "  {:<45} {:>12}",
        "To distribute across channels",
        format_currency(distributable)
    )?;

    Ok(())
}

// ── Channel attribution table ─────────────────────────────────────────────────

/// Render the channel split for one track: rank, views, share of the grand
/// total and the attributed revenue. Partial resolution is reported, never
/// hidden.
pub fn render_channel_table(
    out: &mut impl Write,
    track: &str,
    shares: &[ChannelShare],
    resolved: &ResolvedViews,
    grand_total_views: u64,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Channel attribution for \"{}\"", track)?;
    writeln!(
        out,
        "{:>3}  {:<35} {:>8} {:>8} {:>12}",
        "#", "Channel", "Views", "Share", "Revenue"
    )?;

    for (rank, share) in shares.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<35} {:>8} {:>7.2}% {:>12}",
            rank + 1,
            share.channel,
            abbreviate_count(share.view_count as f64),
            share.view_share * 100.0,
            format_currency(share.attributed_revenue)
        )?;
    }

    let coverage = percentage(
        resolved.resolved_views as f64,
        grand_total_views as f64,
        1,
    );
    writeln!(
        out,
        "Resolved {} of {} views ({:.1}% of the grand total)",
        abbreviate_count(resolved.resolved_views as f64),
        abbreviate_count(grand_total_views as f64),
        coverage
    )?;

    if !resolved.is_complete() {
        writeln!(
            out,
            "Warning: {} content id(s) could not be resolved ({} batch lookup(s) failed); their views are not attributed.",
            resolved.unresolved_ids.len(),
            resolved.failed_batches
        )?;
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
