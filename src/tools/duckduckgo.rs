//! DuckDuckGo web search via the Instant Answer API.

use super::{check_status, http_client, Capability, SearchHit, SearchTool};
use crate::config::SearchSettings;
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Keyless web search.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    Entry {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL")]
        first_url: String,
    },
}

impl DuckDuckGoSearch {
    /// Create a DuckDuckGo client against `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a DuckDuckGo client from search settings.
    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        Self::new(
            &settings.web.base_url,
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

/// Flatten nested topic groups in display order.
fn flatten_topics(topics: Vec<RelatedTopic>, out: &mut Vec<SearchHit>) {
    for topic in topics {
        match topic {
            RelatedTopic::Group { topics } => flatten_topics(topics, out),
            RelatedTopic::Entry { text, first_url } => {
                if first_url.is_empty() {
                    continue;
                }
                // Entry text reads "Title - description".
                let (title, snippet) = match text.split_once(" - ") {
                    Some((title, rest)) => (title.to_string(), Some(rest.to_string())),
                    None => (text, None),
                };
                out.push(SearchHit {
                    title,
                    url: first_url,
                    snippet,
                    capability: Capability::WebSearch,
                });
            }
        }
    }
}

#[async_trait]
impl SearchTool for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn capability(&self) -> Capability {
        Capability::WebSearch
    }

    fn description(&self) -> &str {
        "Search the web for documentation and reference pages on a topic."
    }

    #[instrument(skip(self), fields(provider = "duckduckgo"))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?;
        let response = check_status(self.name(), response).await?;
        let answer: InstantAnswer = response.json().await?;

        let mut hits = Vec::new();
        if !answer.abstract_url.is_empty() {
            hits.push(SearchHit {
                title: if answer.heading.is_empty() {
                    query.to_string()
                } else {
                    answer.heading
                },
                url: answer.abstract_url,
                snippet: (!answer.abstract_text.is_empty()).then_some(answer.abstract_text),
                capability: Capability::WebSearch,
            });
        }
        flatten_topics(answer.related_topics, &mut hits);
        hits.truncate(limit);

        debug!("DuckDuckGo returned {} results", hits.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodemapError;
    use crate::test_support::spawn_server;
    use axum::{http::StatusCode, routing::get, Json, Router};

    fn instant_answer() -> serde_json::Value {
        serde_json::json!({
            "Heading": "Rust (programming language)",
            "AbstractText": "Rust is a general-purpose programming language.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
            "RelatedTopics": [
                {"Text": "Cargo - The Rust package manager", "FirstURL": "https://duckduckgo.com/Cargo", "Icon": {"URL": ""}},
                {
                    "Name": "Tools",
                    "Topics": [
                        {"Text": "Clippy - A collection of lints", "FirstURL": "https://duckduckgo.com/Clippy"},
                        {"Text": "Rustfmt", "FirstURL": "https://duckduckgo.com/Rustfmt"}
                    ]
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_search_flattens_topics() {
        let router = Router::new().route("/", get(|| async { Json(instant_answer()) }));
        let base = spawn_server(router).await;

        let tool = DuckDuckGoSearch::new(&base, Duration::from_secs(5)).unwrap();
        let hits = tool.search("rust", 10).await.unwrap();

        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].title, "Rust (programming language)");
        assert_eq!(hits[1].title, "Cargo");
        assert_eq!(hits[1].snippet.as_deref(), Some("The Rust package manager"));
        assert_eq!(hits[2].url, "https://duckduckgo.com/Clippy");
        assert_eq!(hits[3].title, "Rustfmt");
        assert!(hits[3].snippet.is_none());
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let router = Router::new().route("/", get(|| async { Json(instant_answer()) }));
        let base = spawn_server(router).await;

        let tool = DuckDuckGoSearch::new(&base, Duration::from_secs(5)).unwrap();
        let hits = tool.search("rust", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_server_error_is_provider_error() {
        let router = Router::new().route(
            "/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let base = spawn_server(router).await;

        let tool = DuckDuckGoSearch::new(&base, Duration::from_secs(5)).unwrap();
        let err = tool.search("rust", 5).await.unwrap_err();
        match err {
            CodemapError::Provider {
                provider,
                status,
                body,
            } => {
                assert_eq!(provider, "duckduckgo");
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("Expected provider error, got {other:?}"),
        }
    }
}
