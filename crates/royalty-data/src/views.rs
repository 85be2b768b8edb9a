//! Views export ingestion.
//!
//! The export is a comma-delimited file whose first data row is a synthetic
//! grand-total row: its `Views` cell holds the total for the whole export
//! and its content id carries no meaning. That row is parsed into
//! [`ViewsExport::total_views`] explicitly; the remaining rows become the
//! per-video list.

use std::path::Path;

use royalty_core::error::{Result, RoyaltyError};
use royalty_core::models::{ViewRow, ViewsExport};
use tracing::warn;

/// Required views column: content identifier.
pub const COL_CONTENT: &str = "Content";
/// Required views column: view count.
pub const COL_VIEWS: &str = "Views";

/// Load the views export at `path`.
///
/// The grand-total row must carry a parseable `Views` value; that failure is
/// fatal since every share divides by it. Later rows with an unparseable
/// count are skipped with a warning, mirroring how unparseable revenue cells
/// are treated as localized damage.
pub fn load_views_export(path: &Path) -> Result<ViewsExport> {
    let file = std::fs::File::open(path).map_err(|source| RoyaltyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers()?.clone();
    let content_idx = column_index(&headers, COL_CONTENT)?;
    let views_idx = column_index(&headers, COL_VIEWS)?;

    let mut total_views: Option<u64> = None;
    let mut rows: Vec<ViewRow> = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = row?;
        let views_raw = row.get(views_idx).unwrap_or("").trim();

        // First data row: the grand total. Its content id is ignored.
        if total_views.is_none() {
            let parsed = views_raw.parse::<u64>().map_err(|_| {
                RoyaltyError::Parse(format!(
                    "grand-total row has no parseable {} value: {:?}",
                    COL_VIEWS, views_raw
                ))
            })?;
            total_views = Some(parsed);
            continue;
        }

        let content_id = row.get(content_idx).unwrap_or("").trim();
        if content_id.is_empty() {
            skipped += 1;
            continue;
        }
        let Ok(view_count) = views_raw.parse::<u64>() else {
            warn!(content_id, views = views_raw, "skipping row with unparseable view count");
            skipped += 1;
            continue;
        };

        rows.push(ViewRow {
            content_id: content_id.to_string(),
            view_count,
        });
    }

    let Some(total_views) = total_views else {
        return Err(RoyaltyError::Parse("views export has no data rows".to_string()));
    };

    if skipped > 0 {
        warn!("views export {}: skipped {} unusable rows", path.display(), skipped);
    }

    Ok(ViewsExport { total_views, rows })
}

/// Index of `name` in the header row, or a `MissingColumn` error.
fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| RoyaltyError::MissingColumn(name.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
