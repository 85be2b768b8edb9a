//! Royalty ledger ingestion.
//!
//! The ledger is a semicolon-delimited export with one row per royalty
//! transaction. Revenue amounts use a comma as the decimal separator and are
//! normalized to dot-decimal numbers on load; a cell that cannot be coerced
//! becomes a "missing" value rather than failing the whole file.

use std::path::Path;

use chrono::Utc;
use royalty_core::error::{Result, RoyaltyError};
use royalty_core::models::RevenueRecord;
use royalty_core::platforms;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Required ledger column: platform name.
pub const COL_PLATFORM: &str = "Platform";
/// Required ledger column: track title.
pub const COL_TRACK_TITLE: &str = "Track title";
/// Required ledger column: net revenue (comma-decimal string).
pub const COL_NET_REVENUE: &str = "Net Revenue";

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside a ledger load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    /// ISO-8601 timestamp when the load finished.
    pub generated_at: String,
    /// Number of data rows read from the file.
    pub rows_read: usize,
    /// Number of rows kept after allow-list filtering.
    pub rows_kept: usize,
    /// Number of kept rows whose revenue cell could not be coerced.
    pub missing_revenue_values: usize,
    /// Wall-clock seconds spent loading and parsing the file.
    pub load_time_seconds: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and normalize the royalty ledger at `path`.
///
/// Rows whose `Platform` is not in `allowed` are discarded. A revenue cell
/// that does not parse becomes `None` and is excluded from sums downstream;
/// the row itself is kept. A missing required column or a structurally
/// malformed file fails the whole load with no partial result.
pub fn load_ledger(path: &Path, allowed: &[String]) -> Result<(Vec<RevenueRecord>, LedgerStats)> {
    let load_start = std::time::Instant::now();

    let file = std::fs::File::open(path).map_err(|source| RoyaltyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(file);

    let headers = reader.headers()?.clone();
    let platform_idx = column_index(&headers, COL_PLATFORM)?;
    let track_idx = column_index(&headers, COL_TRACK_TITLE)?;
    let revenue_idx = column_index(&headers, COL_NET_REVENUE)?;

    let mut records: Vec<RevenueRecord> = Vec::new();
    let mut rows_read = 0usize;
    let mut missing_revenue_values = 0usize;

    for row in reader.records() {
        let row = row?;
        rows_read += 1;

        let platform = row.get(platform_idx).unwrap_or("").trim();
        if !platforms::is_allowed(platform, allowed) {
            continue;
        }

        let track_title = row.get(track_idx).unwrap_or("").trim();
        let net_revenue = parse_net_revenue(row.get(revenue_idx).unwrap_or(""));
        if net_revenue.is_none() {
            missing_revenue_values += 1;
        }

        records.push(RevenueRecord {
            platform: platform.to_string(),
            track_title: track_title.to_string(),
            net_revenue,
        });
    }

    let stats = LedgerStats {
        generated_at: Utc::now().to_rfc3339(),
        rows_read,
        rows_kept: records.len(),
        missing_revenue_values,
        load_time_seconds: load_start.elapsed().as_secs_f64(),
    };

    debug!(
        "Ledger {}: {} rows read, {} kept, {} missing revenue cells",
        path.display(),
        stats.rows_read,
        stats.rows_kept,
        stats.missing_revenue_values,
    );

    Ok((records, stats))
}

/// Normalize a comma-decimal revenue string to a number.
///
/// Returns `None` for anything that does not parse ("missing"), including
/// the empty string.
pub fn parse_net_revenue(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Index of `name` in the header row, or a `MissingColumn` error.
fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| RoyaltyError::MissingColumn(name.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
