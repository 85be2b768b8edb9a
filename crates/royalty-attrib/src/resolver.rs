//! Content-id → channel resolution against the external catalog API.

use royalty_core::error::{Result, RoyaltyError};
use serde::Deserialize;

/// Maximum number of content ids the catalog API accepts per round trip.
pub const MAX_BATCH_SIZE: usize = 50;

/// One resolved `(content id, owning channel)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChannel {
    /// The content id as echoed back by the catalog.
    pub content_id: String,
    /// Display name of the owning channel.
    pub channel: String,
}

/// Seam between the attribution pipeline and the catalog transport.
///
/// Implementations resolve one batch of at most [`MAX_BATCH_SIZE`] ids in a
/// single round trip. A batch-level failure is an `Err`; an id the catalog
/// simply does not know is just absent from the returned list.
#[allow(async_fn_in_trait)]
pub trait ChannelResolver {
    async fn resolve_batch(&self, ids: &[String]) -> Result<Vec<ResolvedChannel>>;
}

// ── HTTP implementation ───────────────────────────────────────────────────────

/// Catalog video-list response (`items[].id` + `items[].snippet.channelTitle`).
#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(rename = "channelTitle")]
    channel_title: String,
}

/// [`ChannelResolver`] backed by the catalog's HTTP video-list endpoint.
///
/// The credential is supplied by the caller (CLI flag or environment); it is
/// never baked into the binary.
pub struct HttpChannelResolver {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpChannelResolver {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl ChannelResolver for HttpChannelResolver {
    async fn resolve_batch(&self, ids: &[String]) -> Result<Vec<ResolvedChannel>> {
        let joined = ids.join(",");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("part", "snippet"),
                ("id", joined.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| RoyaltyError::Lookup(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoyaltyError::Lookup(format!(
                "catalog API returned status {status}"
            )));
        }

        let body: VideoListResponse = response
            .json()
            .await
            .map_err(|e| RoyaltyError::Lookup(format!("unreadable response body: {e}")))?;

        Ok(body
            .items
            .into_iter()
            .map(|item| ResolvedChannel {
                content_id: item.id,
                channel: item.snippet.channel_title,
            })
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
