//! Search capabilities exposed to agents.
//!
//! Each adapter wraps one third-party search API behind the [`SearchTool`]
//! trait. Adapters do not retry: provider failures are surfaced to the
//! caller unchanged.

mod duckduckgo;
mod tavily;
mod youtube;

pub use duckduckgo::DuckDuckGoSearch;
pub use tavily::TavilySearch;
pub use youtube::YoutubeSearch;

use crate::error::{CodemapError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub type SharedSearchTool = Arc<dyn SearchTool>;

/// Kind of external lookup a tool performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// General web search.
    WebSearch,
    /// Topic-focused search over curated sources (blogs, tutorials, repositories).
    CuratedSearch,
    /// Video search.
    VideoSearch,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::WebSearch => write!(f, "web-search"),
            Capability::CuratedSearch => write!(f, "curated-search"),
            Capability::VideoSearch => write!(f, "video-search"),
        }
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
    pub capability: Capability,
}

/// Trait for search providers.
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Provider name used in logs and errors.
    fn name(&self) -> &str;

    /// The capability this tool provides.
    fn capability(&self) -> Capability;

    /// Description shown to the model.
    fn description(&self) -> &str;

    /// Run a query and return results in provider order.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

/// Render hits as numbered text for a model.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results found.".to_string();
    }

    let formatted = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| match &hit.snippet {
            Some(snippet) if !snippet.is_empty() => format!(
                "{}. {}\n   {}\n   {}",
                i + 1,
                hit.title,
                hit.url,
                snippet.chars().take(300).collect::<String>()
            ),
            _ => format!("{}. {}\n   {}", i + 1, hit.title, hit.url),
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Found {} results:\n\n{}", hits.len(), formatted)
}

/// Build the HTTP client shared by an adapter.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("codemap/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CodemapError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-success response into a provider error.
pub(crate) async fn check_status(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CodemapError::Provider {
        provider: provider.to_string(),
        status: status.as_u16(),
        body: body.chars().take(500).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hits() {
        let hits = vec![
            SearchHit {
                title: "The Rust Book".to_string(),
                url: "https://doc.rust-lang.org/book/".to_string(),
                snippet: Some("Learn Rust".to_string()),
                capability: Capability::CuratedSearch,
            },
            SearchHit {
                title: "Rustlings".to_string(),
                url: "https://github.com/rust-lang/rustlings".to_string(),
                snippet: None,
                capability: Capability::CuratedSearch,
            },
        ];

        let text = format_hits(&hits);
        assert!(text.starts_with("Found 2 results:"));
        let first = "1. The Rust Book\n   https://doc.rust-lang.org/book/\n   Learn Rust";
        assert!(text.contains(first));
        assert!(text.contains("2. Rustlings\n   https://github.com/rust-lang/rustlings"));
    }

    #[test]
    fn test_format_no_hits() {
        assert_eq!(format_hits(&[]), "No results found.");
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(Capability::VideoSearch.to_string(), "video-search");
        assert_eq!(
            serde_json::to_string(&Capability::CuratedSearch).unwrap(),
            "\"curated_search\""
        );
    }
}
