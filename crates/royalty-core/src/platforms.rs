//! The fixed catalog of video platforms eligible for revenue aggregation.
//!
//! Ledger rows are filtered against an allow-list of platform names. The
//! default list below matches the distributor's video-platform categories;
//! it can be overridden per run from the CLI.

/// Platform names retained by default when loading a ledger.
pub const DEFAULT_VIDEO_PLATFORMS: &[&str] = &[
    "YouTube Music Premium",
    "Youtube Shorts",
    "Facebook / Instagram",
    "Believe Rights Services (YouTube)",
    "TikTok",
    "YouTube Official Music Content",
    "Youtube Audio Tier",
    "Youtube Audio Fingerprint",
];

/// The default allow-list as owned strings, preserving catalog order.
pub fn default_platforms() -> Vec<String> {
    DEFAULT_VIDEO_PLATFORMS.iter().map(|s| s.to_string()).collect()
}

/// The subset of `platforms` whose name contains "youtube"
/// (case-insensitive). Used as the default platform subset when
/// redistributing a track's revenue across channels.
pub fn youtube_platforms(platforms: &[String]) -> Vec<String> {
    platforms
        .iter()
        .filter(|p| p.to_lowercase().contains("youtube"))
        .cloned()
        .collect()
}

/// Returns `true` when `platform` is a member of `allowed` (exact match).
pub fn is_allowed(platform: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a == platform)
}
