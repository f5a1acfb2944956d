//! Helpers shared by unit tests.

use crate::error::{CodemapError, Result};
use crate::tools::{Capability, SearchHit, SearchTool};
use async_trait::async_trait;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serve `router` on an ephemeral local port and return its base URL.
pub(crate) async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Search tool that counts calls and optionally fails like a provider outage.
pub(crate) struct CountingTool {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CountingTool {
    pub fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchTool for CountingTool {
    fn name(&self) -> &str {
        "counting"
    }

    fn capability(&self) -> Capability {
        Capability::VideoSearch
    }

    fn description(&self) -> &str {
        "Counts searches"
    }

    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CodemapError::Provider {
                provider: "counting".to_string(),
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(vec![SearchHit {
            title: format!("Video about {}", query),
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            snippet: None,
            capability: Capability::VideoSearch,
        }])
    }
}
