//! Error types for Codemap.

use thiserror::Error;

/// Library-level error type for Codemap operations.
#[derive(Error, Debug)]
pub enum CodemapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: {0} is not set or empty. Export it or add it to .env")]
    MissingCredential(String),

    #[error("{provider} returned HTTP {status}: {body}")]
    Provider {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid roadmap: {0}")]
    InvalidRoadmap(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

impl CodemapError {
    /// Whether the error originated at a third-party service or in the model's output.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CodemapError::Provider { .. }
                | CodemapError::Http(_)
                | CodemapError::OpenAI(_)
                | CodemapError::InvalidRoadmap(_)
        )
    }
}

/// Result type alias for Codemap operations.
pub type Result<T> = std::result::Result<T, CodemapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        let provider = CodemapError::Provider {
            provider: "tavily".to_string(),
            status: 429,
            body: "rate limited".to_string(),
        };
        assert!(provider.is_upstream());
        assert_eq!(provider.to_string(), "tavily returned HTTP 429: rate limited");

        assert!(CodemapError::InvalidRoadmap("no steps".to_string()).is_upstream());
        assert!(!CodemapError::InvalidInput("empty topic".to_string()).is_upstream());
        assert!(!CodemapError::Agent("loop".to_string()).is_upstream());
    }
}
