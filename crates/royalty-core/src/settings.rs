use clap::Parser;
use std::path::PathBuf;

use crate::platforms;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Royalty statement analysis with optional channel-level revenue attribution
#[derive(Parser, Debug, Clone)]
#[command(
    name = "royalty-report",
    about = "Aggregate royalty-statement revenue by platform and track",
    version
)]
pub struct Settings {
    /// Path to the royalty ledger export (semicolon-delimited CSV)
    #[arg(long)]
    pub ledger: PathBuf,

    /// Platform to retain (repeatable; defaults to the known video platforms)
    #[arg(long = "platform", value_name = "NAME")]
    pub platforms: Vec<String>,

    /// Track title to drill into
    #[arg(long)]
    pub track: Option<String>,

    /// Platform whose revenue feeds the channel split (repeatable; defaults
    /// to every allow-listed platform containing "youtube")
    #[arg(long = "distribute-platform", value_name = "NAME")]
    pub distribute_platforms: Vec<String>,

    /// Path to the views export (comma-delimited CSV); enables channel
    /// attribution for the selected track
    #[arg(long)]
    pub views: Option<PathBuf>,

    /// Catalog API key used for channel resolution
    #[arg(long, env = "CHANNEL_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Catalog API endpoint for video metadata lookups
    #[arg(long, default_value = "https://www.googleapis.com/youtube/v3/videos")]
    pub api_url: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,
}

impl Settings {
    /// The effective platform allow-list: the `--platform` flags when given,
    /// otherwise the default video-platform catalog.
    pub fn allow_list(&self) -> Vec<String> {
        if self.platforms.is_empty() {
            platforms::default_platforms()
        } else {
            self.platforms.clone()
        }
    }

    /// The effective distribution subset: the `--distribute-platform` flags
    /// when given, otherwise the "youtube" members of `allowed`.
    pub fn distribution_subset(&self, allowed: &[String]) -> Vec<String> {
        if self.distribute_platforms.is_empty() {
            platforms::youtube_platforms(allowed)
        } else {
            self.distribute_platforms.clone()
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
