mod bootstrap;
mod report;

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use royalty_attrib::attribution::{attribute_revenue, resolve_channel_views};
use royalty_attrib::resolver::HttpChannelResolver;
use royalty_core::error::RoyaltyError;
use royalty_core::settings::Settings;
use royalty_data::aggregator::{self, summarize};
use royalty_data::{ledger, views};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("royalty-report v{} starting", env!("CARGO_PKG_VERSION"));

    let allowed = settings.allow_list();
    let (records, stats) = ledger::load_ledger(&settings.ledger, &allowed)?;
    let summary = summarize(&records, &allowed);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::render_overview(&mut out, &summary, &stats)?;

    if let Some(track) = &settings.track {
        let per_platform = aggregator::revenue_for_track(&summary.platforms, track);
        let total = summary.track_index.total_for(track).unwrap_or(0.0);
        let subset = settings.distribution_subset(&allowed);
        let distributable =
            aggregator::revenue_from_platform_subset(&summary.platforms, track, &subset);

        report::render_track_drilldown(&mut out, track, &per_platform, total, distributable)?;

        if let Some(views_path) = &settings.views {
            // Attribution failures never take the revenue tables down with
            // them; the error is logged and the run still exits cleanly.
            if let Err(e) =
                run_attribution(&settings, views_path, track, distributable, &mut out).await
            {
                tracing::error!(error = %e, "channel attribution failed");
            }
        }
    } else if settings.views.is_some() {
        tracing::warn!("--views given without --track; channel attribution needs a selected track");
    }

    Ok(())
}

/// Load the views export, resolve channels through the catalog API and
/// render the channel split for `track`.
async fn run_attribution(
    settings: &Settings,
    views_path: &Path,
    track: &str,
    distributable: f64,
    out: &mut impl Write,
) -> royalty_core::error::Result<()> {
    let api_key = settings.api_key.clone().ok_or_else(|| {
        RoyaltyError::Config(
            "channel attribution requires an API key (--api-key or CHANNEL_API_KEY)".to_string(),
        )
    })?;

    let export = views::load_views_export(views_path)?;
    tracing::debug!(
        rows = export.rows.len(),
        total_views = export.total_views,
        "views export loaded"
    );

    let resolver = HttpChannelResolver::new(settings.api_url.clone(), api_key);
    let resolved = resolve_channel_views(&resolver, &export, |fraction| {
        tracing::info!("channel resolution {:.0}% complete", fraction * 100.0);
    })
    .await;

    let shares = attribute_revenue(&resolved, export.total_views, distributable)?;
    report::render_channel_table(out, track, &shares, &resolved, export.total_views)?;

    Ok(())
}
