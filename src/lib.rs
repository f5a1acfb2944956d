//! Codemap - Learning Roadmaps from Search-Backed Agents
//!
//! An HTTP service that answers `GET /roadmap/{topic}` with a structured
//! learning roadmap, written by a team of LLM agents that search the web,
//! curated sources, and YouTube for real resources.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Settings, credentials, and prompt templates
//! - `tools` - Search adapters (Tavily, YouTube, DuckDuckGo)
//! - `llm` - Chat model abstraction over OpenAI-compatible APIs
//! - `agent` - Specialist agents and the delegating team
//! - `roadmap` - Roadmap types, validation, link checking, and generation
//! - `app` - Startup wiring from settings to a ready service
//! - `server` - The HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use codemap::app::AppContext;
//! use codemap::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let context = AppContext::from_env(&settings)?;
//!
//!     let output = context.service().generate("rust async").await?;
//!     println!("{}", output.body);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod roadmap;
pub mod server;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use error::{CodemapError, Result};
