//! Roadmap documents: types, validation, link checking and generation.

pub mod links;
pub mod parse;
pub mod service;

pub use links::{BrokenLink, LinkChecker, LinkReport};
pub use parse::{extract_json, parse_roadmap};
pub use service::{RoadmapOutput, RoadmapService};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// A learning roadmap: an ordered list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub steps: Vec<RoadmapStep>,
}

impl Roadmap {
    /// Every resource URL in step order, duplicates included.
    pub fn resource_urls(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|step| step.resources.iter().map(|r| r.url.as_str()))
    }
}

/// One step of a roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub id: StepId,
    #[serde(default)]
    pub title: String,
    /// Free-form estimate such as "2 weeks".
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub practice: Vec<String>,
}

/// Step identifier. Models emit either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    Number(u64),
    Text(String),
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Number(n) => write!(f, "{}", n),
            StepId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A titled link. Accepts `{"title", "url"}` or a markdown link string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ResourceRepr")]
pub struct Resource {
    pub title: String,
    pub url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResourceRepr {
    Object { title: String, url: String },
    Markdown(String),
}

fn markdown_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\[(?P<title>[^\]]*)\]\(\s*(?P<url>[^)\s]+)\s*\)\s*$")
            .expect("Invalid regex")
    })
}

impl TryFrom<ResourceRepr> for Resource {
    type Error = String;

    fn try_from(repr: ResourceRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ResourceRepr::Object { title, url } => Ok(Resource { title, url }),
            ResourceRepr::Markdown(text) => {
                let caps = markdown_link()
                    .captures(&text)
                    .ok_or_else(|| format!("resource is not a markdown link: {}", text))?;
                Ok(Resource {
                    title: caps["title"].trim().to_string(),
                    url: caps["url"].to_string(),
                })
            }
        }
    }
}
