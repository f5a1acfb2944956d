//! Configuration module for Codemap.
//!
//! Handles loading application settings, prompt templates, and API credentials.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{load_dotenv, mask, Credentials};
pub use prompts::{MemberPrompts, Prompts, TeamPrompts};
pub use settings::{
    GeneralSettings, LlmSettings, PromptSettings, RoadmapSettings, SearchSettings,
    ServerSettings, Settings, TavilySettings, WebSearchSettings, YoutubeSettings,
};
