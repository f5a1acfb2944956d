//! Configuration settings for Codemap.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub roadmap: RoadmapSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Optional dotenv file loaded before credentials are read.
    pub env_file: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            env_file: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Language model settings shared by every agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible chat completions API.
    pub api_base: String,
    /// Model identifier.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature (None = provider default).
    pub temperature: Option<f32>,
    /// Maximum model round-trips per agent run.
    pub max_iterations: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
            temperature: None,
            max_iterations: 10,
        }
    }
}

/// Search capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results requested per search call.
    pub max_results: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub tavily: TavilySettings,
    pub youtube: YoutubeSettings,
    pub web: WebSearchSettings,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 5,
            timeout_secs: 30,
            tavily: TavilySettings::default(),
            youtube: YoutubeSettings::default(),
            web: WebSearchSettings::default(),
        }
    }
}

/// Tavily curated search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TavilySettings {
    pub enabled: bool,
    pub api_key_env: String,
    pub base_url: String,
    /// Search depth (basic, advanced).
    pub search_depth: String,
}

impl Default for TavilySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "TAVILY_API_KEY".to_string(),
            base_url: "https://api.tavily.com".to_string(),
            search_depth: "basic".to_string(),
        }
    }
}

/// YouTube Data API video search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    pub enabled: bool,
    pub api_key_env: String,
    pub base_url: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "YOUTUBE_API_KEY".to_string(),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
        }
    }
}

/// DuckDuckGo web search (no key required).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchSettings {
    pub enabled: bool,
    pub base_url: String,
}

impl Default for WebSearchSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.duckduckgo.com".to_string(),
        }
    }
}

/// Roadmap shape and validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapSettings {
    /// Minimum number of steps accepted.
    pub min_steps: usize,
    /// Maximum number of steps accepted.
    pub max_steps: usize,
    /// Fewest steps the prompts ask for.
    pub target_min_steps: usize,
    /// Most steps the prompts ask for.
    pub target_max_steps: usize,
    /// Probe resource links and drop broken ones.
    pub check_links: bool,
    /// Per-link timeout in seconds.
    pub link_timeout_secs: u64,
    /// Links probed concurrently.
    pub link_concurrency: usize,
}

impl Default for RoadmapSettings {
    fn default() -> Self {
        Self {
            min_steps: 1,
            max_steps: 12,
            target_min_steps: 7,
            target_max_steps: 8,
            check_links: false,
            link_timeout_secs: 10,
            link_concurrency: 8,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Reject combinations that can never produce a roadmap.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::CodemapError;

        if self.roadmap.min_steps == 0 || self.roadmap.min_steps > self.roadmap.max_steps {
            return Err(CodemapError::Config(format!(
                "roadmap.min_steps ({}) must be between 1 and roadmap.max_steps ({})",
                self.roadmap.min_steps, self.roadmap.max_steps
            )));
        }
        let roadmap = &self.roadmap;
        if roadmap.target_min_steps > roadmap.target_max_steps
            || roadmap.target_min_steps < roadmap.min_steps
            || roadmap.target_max_steps > roadmap.max_steps
        {
            return Err(CodemapError::Config(format!(
                "roadmap target steps ({} to {}) must lie within {} to {}",
                roadmap.target_min_steps,
                roadmap.target_max_steps,
                roadmap.min_steps,
                roadmap.max_steps
            )));
        }
        if self.llm.max_iterations == 0 {
            return Err(CodemapError::Config(
                "llm.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.roadmap.link_concurrency == 0 {
            return Err(CodemapError::Config(
                "roadmap.link_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("codemap")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded dotenv path, if one is configured.
    pub fn env_file(&self) -> Option<PathBuf> {
        self.general.env_file.as_deref().map(Self::expand_path)
    }
}
