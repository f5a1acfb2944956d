//! API credentials read from the process environment.
//!
//! Every key an enabled component needs is checked up front, so a
//! misconfigured deployment fails before any agent is built or a port is
//! bound.

use super::Settings;
use crate::error::{CodemapError, Result};
use std::path::Path;
use tracing::debug;

/// API keys for the model provider and the enabled search capabilities.
#[derive(Clone)]
pub struct Credentials {
    pub llm_api_key: String,
    pub tavily_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &mask(&self.llm_api_key))
            .field("tavily_api_key", &self.tavily_api_key.as_deref().map(mask))
            .field("youtube_api_key", &self.youtube_api_key.as_deref().map(mask))
            .finish()
    }
}

impl Credentials {
    /// Load a dotenv file (if present) and read credentials from the environment.
    pub fn from_env(settings: &Settings) -> Result<Self> {
        load_dotenv(settings.env_file().as_deref());
        Self::load_with(settings, |name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, failing on the first missing or empty key.
    pub fn load_with<F>(settings: &Settings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(CodemapError::MissingCredential(name.to_string())),
            }
        };

        let llm_api_key = require(&settings.llm.api_key_env)?;

        let tavily_api_key = if settings.search.tavily.enabled {
            Some(require(&settings.search.tavily.api_key_env)?)
        } else {
            None
        };

        let youtube_api_key = if settings.search.youtube.enabled {
            Some(require(&settings.search.youtube.api_key_env)?)
        } else {
            None
        };

        Ok(Self {
            llm_api_key,
            tavily_api_key,
            youtube_api_key,
        })
    }

    /// Names of every environment variable the given settings require.
    pub fn required_vars(settings: &Settings) -> Vec<String> {
        let mut vars = vec![settings.llm.api_key_env.clone()];
        if settings.search.tavily.enabled {
            vars.push(settings.search.tavily.api_key_env.clone());
        }
        if settings.search.youtube.enabled {
            vars.push(settings.search.youtube.api_key_env.clone());
        }
        vars
    }
}

/// Load a dotenv file. A missing file is not an error.
pub fn load_dotenv(path: Option<&Path>) {
    let loaded = match path {
        Some(p) => dotenvy::from_path(p).map(|_| p.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No dotenv file loaded: {}", e),
    }
}

/// Mask a secret for display, keeping a short prefix and suffix.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
