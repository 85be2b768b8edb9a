use serde::{Deserialize, Serialize};

/// A single royalty transaction row read from the ledger export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueRecord {
    /// Distribution platform name; always a member of the configured
    /// allow-list once the ledger has been filtered.
    pub platform: String,
    /// Track title. Not unique: royalty lines are legitimately split across
    /// sub-periods, so the same title can appear on many rows.
    pub track_title: String,
    /// Net revenue in euros. `None` when the source cell could not be
    /// coerced to a number ("missing"); missing values are excluded from
    /// sums but the row still counts toward load statistics.
    pub net_revenue: Option<f64>,
}

/// One per-video row of a views export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRow {
    /// Platform-specific content identifier (e.g. a video id).
    pub content_id: String,
    /// View count for this piece of content.
    pub view_count: u64,
}

/// A parsed views export.
///
/// The export's first data row is a synthetic grand-total row: its `Views`
/// cell holds the total for the whole file and its content id carries no
/// meaning. It is modeled here as an explicit field rather than an implicit
/// off-by-one convention over the row list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsExport {
    /// Total views over the whole export, from the grand-total row.
    pub total_views: u64,
    /// Per-video rows (the grand-total row excluded).
    pub rows: Vec<ViewRow>,
}

impl ViewsExport {
    /// Sum of the per-video view counts. May differ from [`total_views`]
    /// when the export itself is inconsistent; shares are always computed
    /// against the declared grand total.
    ///
    /// [`total_views`]: ViewsExport::total_views
    pub fn row_views(&self) -> u64 {
        self.rows.iter().map(|r| r.view_count).sum()
    }
}

/// One channel's slice of an attribution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelShare {
    /// Display name of the channel that owns the resolved content.
    pub channel: String,
    /// Views summed over every content id resolved to this channel.
    pub view_count: u64,
    /// `view_count / grand_total_views`, in `[0, 1]`.
    pub view_share: f64,
    /// `view_share * revenue_to_distribute`, in euros.
    pub attributed_revenue: f64,
}
