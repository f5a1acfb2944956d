//! YouTube video search via the YouTube Data API v3.

use super::{check_status, http_client, Capability, SearchHit, SearchTool};
use crate::config::SearchSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// YouTube video search.
pub struct YoutubeSearch {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: ResourceId,
    snippet: Snippet,
}

#[derive(Deserialize)]
struct ResourceId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
}

impl YoutubeSearch {
    /// Create a YouTube client against `base_url`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a YouTube client from search settings.
    pub fn from_settings(settings: &SearchSettings, api_key: &str) -> Result<Self> {
        Self::new(
            api_key,
            &settings.youtube.base_url,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Canonical watch URL for a video.
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }
}

#[async_trait]
impl SearchTool for YoutubeSearch {
    fn name(&self) -> &str {
        "youtube"
    }

    fn capability(&self) -> Capability {
        Capability::VideoSearch
    }

    fn description(&self) -> &str {
        "Search YouTube for tutorial and lecture videos on a topic."
    }

    #[instrument(skip(self), fields(provider = "youtube"))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let max_results = limit.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(self.name(), response).await?;
        let parsed: SearchListResponse = response.json().await?;

        // Channel and playlist results carry no videoId.
        let hits: Vec<SearchHit> = parsed
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let mut snippet = decode_entities(&item.snippet.description);
                if !item.snippet.channel_title.is_empty() {
                    let channel = decode_entities(&item.snippet.channel_title);
                    snippet = format!("{} | {}", channel, snippet);
                }
                Some(SearchHit {
                    title: decode_entities(&item.snippet.title),
                    url: Self::watch_url(&video_id),
                    snippet: Some(snippet),
                    capability: Capability::VideoSearch,
                })
            })
            .take(limit)
            .collect();

        debug!("YouTube returned {} videos", hits.len());
        Ok(hits)
    }
}

/// The Data API HTML-escapes titles and descriptions.
fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
