//! Tavily curated search.

use super::{check_status, http_client, Capability, SearchHit, SearchTool};
use crate::config::SearchSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Topic search over blogs, tutorials, and repositories via the Tavily API.
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    search_depth: String,
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    #[serde(default)]
    content: Option<String>,
}

impl TavilySearch {
    /// Create a Tavily client against `base_url`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            search_depth: "basic".to_string(),
        })
    }

    /// Create a Tavily client from search settings.
    pub fn from_settings(settings: &SearchSettings, api_key: &str) -> Result<Self> {
        Ok(Self::new(
            api_key,
            &settings.tavily.base_url,
            Duration::from_secs(settings.timeout_secs),
        )?
        .with_search_depth(&settings.tavily.search_depth))
    }

    /// Set the search depth (basic, advanced).
    pub fn with_search_depth(mut self, depth: &str) -> Self {
        self.search_depth = depth.to_string();
        self
    }
}

#[async_trait]
impl SearchTool for TavilySearch {
    fn name(&self) -> &str {
        "tavily"
    }

    fn capability(&self) -> Capability {
        Capability::CuratedSearch
    }

    fn description(&self) -> &str {
        "Search curated web sources (blogs, tutorials, documentation, GitHub repositories) for a topic."
    }

    #[instrument(skip(self), fields(provider = "tavily"))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results: limit,
            search_depth: &self.search_depth,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await?;
        let response = check_status(self.name(), response).await?;
        let parsed: TavilyResponse = response.json().await?;

        let hits: Vec<SearchHit> = parsed
            .results
            .into_iter()
            .take(limit)
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                snippet: r.content,
                capability: Capability::CuratedSearch,
            })
            .collect();

        debug!("Tavily returned {} results", hits.len());
        Ok(hits)
    }
}
