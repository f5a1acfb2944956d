//! Prompt templates for Codemap.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub team: TeamPrompts,
    pub members: MemberPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the aggregating team agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamPrompts {
    pub description: String,
    pub instructions: String,
}

impl Default for TeamPrompts {
    fn default() -> Self {
        Self {
            description: "You are a team of agents that work together to provide a complete learning \
                experience with video links, blog links, web search results, and a learning path. \
                Check for broken links and provide valid resources."
                .to_string(),

            instructions: r#"Today is {{date}}.

Create a structured learning roadmap for the topic given by the user with {{min_steps}} to {{max_steps}} steps.
Delegate to your team members with the `delegate_task` tool to collect blogs, videos, and web resources before you answer.

Each step must include:
- "id": the step number, starting at 1
- "title": a short title
- "duration": an estimate such as "4 hours"
- "description": a brief description
- "resources": an array of {"title": "...", "url": "https://..."} objects, including valid GitHub repositories and blog articles
- "practice": an array of practice exercises

Only use links returned by your team members or links you are certain exist. Never invent URLs.

IMPORTANT: Return ONLY a raw JSON object of the form {"steps": [...]} without any markdown formatting, code blocks, or backticks.
The response must start with { and end with } and be valid JSON."#
                .to_string(),
        }
    }
}

/// Instruction text for each specialist team member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberPrompts {
    /// Instruction-only roadmap planner.
    pub planner: String,
    /// Curated topic search (Tavily).
    pub blogs: String,
    /// Video search (YouTube).
    pub videos: String,
    /// General web search (DuckDuckGo).
    pub web: String,
}

impl Default for MemberPrompts {
    fn default() -> Self {
        Self {
            planner: r#"You are Code-Map, an AI learning assistant that creates personalized learning roadmaps for any technology or skill.
Outline {{min_steps}} to {{max_steps}} learning steps for the requested topic, ordered from fundamentals to advanced practice.
For each step give a title, a duration estimate, a brief description, and practice exercises."#
                .to_string(),
            blogs: "You are a search agent. Use the search tool to find relevant blogs, tutorials, \
                and GitHub repositories for the given query. Reply with a list of titles and URLs \
                taken from the search results."
                .to_string(),
            videos: "You are a YouTube agent. Use the search tool to find relevant videos for the \
                given query. Reply with a list of video titles and URLs taken from the search results."
                .to_string(),
            web: "You are a web research agent. Use the search tool to find official documentation \
                and reference pages for the given query. Reply with a list of titles and URLs taken \
                from the search results."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let team_path = custom_path.join("team.toml");
            if team_path.exists() {
                let content = std::fs::read_to_string(&team_path)?;
                prompts.team = toml::from_str(&content)?;
            }

            let members_path = custom_path.join("members.toml");
            if members_path.exists() {
                let content = std::fs::read_to_string(&members_path)?;
                prompts.members = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.team.instructions.contains("raw JSON object"));
        assert!(prompts.team.instructions.contains("delegate_task"));
        assert!(!prompts.members.planner.is_empty());
    }

    #[test]
    fn test_render() {
        let mut vars = HashMap::new();
        vars.insert("min_steps".to_string(), "7".to_string());
        vars.insert("max_steps".to_string(), "8".to_string());

        let rendered = Prompts::render("between {{min_steps}} and {{max_steps}}", &vars);
        assert_eq!(rendered, "between 7 and 8");
    }

    #[test]
    fn test_render_with_custom_prefers_provided() {
        let mut custom = HashMap::new();
        custom.insert("audience".to_string(), "beginners".to_string());
        custom.insert("date".to_string(), "never".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("date".to_string(), "2026-01-01".to_string());

        let rendered = prompts.render_with_custom("{{audience}} on {{date}}", &vars);
        assert_eq!(rendered, "beginners on 2026-01-01");
    }

    #[test]
    fn test_load_custom_members() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("members.toml"),
            "videos = \"Only find conference talks.\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.members.videos, "Only find conference talks.");
        // Fields absent from the file keep their defaults.
        assert!(prompts.members.planner.contains("Code-Map"));
        assert!(prompts.team.instructions.contains("raw JSON object"));
    }
}
