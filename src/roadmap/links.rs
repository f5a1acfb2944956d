//! Dead-link detection for roadmap resources.

use super::Roadmap;
use crate::config::RoadmapSettings;
use crate::error::Result;
use futures::stream::{self, StreamExt};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Probes resource URLs with HEAD, falling back to GET.
pub struct LinkChecker {
    client: reqwest::Client,
    concurrency: usize,
}

/// Outcome of checking every resource in a roadmap.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkReport {
    /// Distinct URLs probed.
    pub checked: usize,
    pub broken: Vec<BrokenLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokenLink {
    pub url: String,
    pub reason: String,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.broken.is_empty()
    }

    /// Remove resources whose URL was reported broken. Returns how many were removed.
    pub fn prune(&self, roadmap: &mut Roadmap) -> usize {
        let broken: HashSet<&str> = self.broken.iter().map(|b| b.url.as_str()).collect();
        let mut removed = 0;
        for step in &mut roadmap.steps {
            let before = step.resources.len();
            step.resources.retain(|r| !broken.contains(r.url.as_str()));
            removed += before - step.resources.len();
        }
        removed
    }
}

impl LinkChecker {
    pub fn new(timeout: Duration, concurrency: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("codemap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            concurrency: concurrency.max(1),
        })
    }

    pub fn from_settings(settings: &RoadmapSettings) -> Result<Self> {
        Self::new(
            Duration::from_secs(settings.link_timeout_secs),
            settings.link_concurrency,
        )
    }

    /// Probe each distinct resource URL once.
    #[instrument(skip_all, fields(steps = roadmap.steps.len()))]
    pub async fn check(&self, roadmap: &Roadmap) -> LinkReport {
        let mut seen = HashSet::new();
        let urls: Vec<String> = roadmap
            .resource_urls()
            .filter(|url| seen.insert(*url))
            .map(str::to_string)
            .collect();
        let checked = urls.len();

        let mut results: Vec<(usize, String, Option<String>)> =
            stream::iter(urls.into_iter().enumerate())
                .map(|(idx, url)| async move {
                    let failure = self.probe(&url).await;
                    (idx, url, failure)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        results.sort_by_key(|(idx, _, _)| *idx);

        let broken: Vec<BrokenLink> = results
            .into_iter()
            .filter_map(|(_, url, failure)| failure.map(|reason| BrokenLink { url, reason }))
            .collect();

        for link in &broken {
            warn!("Broken link {}: {}", link.url, link.reason);
        }
        info!("Checked {} links, {} broken", checked, broken.len());

        LinkReport { checked, broken }
    }

    /// `None` when the link is live, otherwise why it is not.
    async fn probe(&self, url: &str) -> Option<String> {
        let status = match self.status(Method::HEAD, url).await {
            Ok(status)
                if status == StatusCode::METHOD_NOT_ALLOWED
                    || status == StatusCode::NOT_IMPLEMENTED =>
            {
                debug!("HEAD not supported by {}, retrying with GET", url);
                self.status(Method::GET, url).await
            }
            other => other,
        };

        match status {
            Ok(status) if status.as_u16() >= 400 => Some(format!("HTTP {}", status.as_u16())),
            Ok(_) => None,
            Err(e) => Some(e.to_string()),
        }
    }

    async fn status(
        &self,
        method: Method,
        url: &str,
    ) -> std::result::Result<StatusCode, reqwest::Error> {
        let response = self.client.request(method, url).send().await?;
        Ok(response.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::{Resource, RoadmapStep, StepId};
    use crate::test_support::spawn_server;
    use axum::http::{Method as HttpMethod, StatusCode as HttpStatus};
    use axum::{routing::any, routing::get, Router};
    use std::sync::Arc;

    fn roadmap_with(urls: &[&str]) -> Roadmap {
        Roadmap {
            steps: vec![RoadmapStep {
                id: StepId::Number(1),
                title: "Basics".to_string(),
                duration: "1 week".to_string(),
                description: "Start here".to_string(),
                resources: urls
                    .iter()
                    .map(|url| Resource {
                        title: "link".to_string(),
                        url: url.to_string(),
                    })
                    .collect(),
                practice: Vec::new(),
            }],
        }
    }

    async fn link_server() -> String {
        let router = Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/get-only",
                any(|method: HttpMethod| async move {
                    if method == HttpMethod::HEAD {
                        HttpStatus::METHOD_NOT_ALLOWED
                    } else {
                        HttpStatus::OK
                    }
                }),
            )
            .route("/gone", get(|| async { HttpStatus::GONE }));
        spawn_server(router).await
    }

    async fn unreachable_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/nothing", addr)
    }

    #[tokio::test]
    async fn test_flags_missing_and_unreachable() {
        let base = link_server().await;
        let dead = unreachable_url().await;
        let ok = format!("{}/ok", base);
        let missing = format!("{}/missing", base);
        let gone = format!("{}/gone", base);
        let get_only = format!("{}/get-only", base);

        let roadmap = roadmap_with(&[
            ok.as_str(),
            missing.as_str(),
            dead.as_str(),
            gone.as_str(),
            get_only.as_str(),
            ok.as_str(),
        ]);
        let checker = LinkChecker::new(Duration::from_secs(5), 4).unwrap();
        let report = checker.check(&roadmap).await;

        assert_eq!(report.checked, 5);
        let broken: Vec<&str> = report.broken.iter().map(|b| b.url.as_str()).collect();
        assert_eq!(broken, vec![missing.as_str(), dead.as_str(), gone.as_str()]);
        assert_eq!(report.broken[0].reason, "HTTP 404");
        assert_eq!(report.broken[2].reason, "HTTP 410");
    }

    #[tokio::test]
    async fn test_prune_keeps_live_links() {
        let base = link_server().await;
        let ok = format!("{}/ok", base);
        let missing = format!("{}/missing", base);

        let mut roadmap = roadmap_with(&[ok.as_str(), missing.as_str()]);
        let checker = LinkChecker::new(Duration::from_secs(5), 2).unwrap();
        let report = checker.check(&roadmap).await;

        assert_eq!(report.prune(&mut roadmap), 1);
        assert_eq!(roadmap.steps[0].resources.len(), 1);
        assert_eq!(roadmap.steps[0].resources[0].url, ok);
    }

    #[tokio::test]
    async fn test_check_runs_on_spawned_task() {
        let base = link_server().await;
        let roadmap = roadmap_with(&[format!("{}/ok", base).as_str()]);
        let checker = Arc::new(LinkChecker::new(Duration::from_secs(5), 2).unwrap());

        let handle = tokio::spawn({
            let checker = checker.clone();
            async move { checker.check(&roadmap).await }
        });
        let report = handle.await.unwrap();

        assert_eq!(report.checked, 1);
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn test_no_resources_is_clean() {
        let checker = LinkChecker::new(Duration::from_secs(1), 1).unwrap();
        let report = checker.check(&roadmap_with(&[])).await;
        assert!(report.is_clean());
        assert_eq!(report.checked, 0);
    }
}
