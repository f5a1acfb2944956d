//! Application wiring.
//!
//! Builds everything a request needs once, at startup: credentials, search
//! adapters, specialist agents, the roadmap team, and the service around it.

use crate::agent::{Agent, Team};
use crate::config::{Credentials, Prompts, Settings};
use crate::error::{CodemapError, Result};
use crate::llm::{OpenAiChatModel, SharedChatModel};
use crate::roadmap::RoadmapService;
use crate::tools::{DuckDuckGoSearch, SharedSearchTool, TavilySearch, YoutubeSearch};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Fully initialized application.
pub struct AppContext {
    settings: Settings,
    service: RoadmapService,
}

impl AppContext {
    /// Initialize with credentials read through `lookup`.
    pub fn initialize<F>(settings: &Settings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::load_with(settings, lookup)?;
        Self::with_credentials(settings, &credentials)
    }

    /// Initialize from the process environment, loading `.env` first.
    pub fn from_env(settings: &Settings) -> Result<Self> {
        let credentials = Credentials::from_env(settings)?;
        Self::with_credentials(settings, &credentials)
    }

    /// Initialize with the configured OpenAI-compatible model.
    pub fn with_credentials(settings: &Settings, credentials: &Credentials) -> Result<Self> {
        let model: SharedChatModel = Arc::new(OpenAiChatModel::from_settings(
            &settings.llm,
            &credentials.llm_api_key,
        )?);
        Self::with_model(settings, credentials, model)
    }

    /// Initialize with an explicit model shared by every agent.
    pub fn with_model(
        settings: &Settings,
        credentials: &Credentials,
        model: SharedChatModel,
    ) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let mut vars = HashMap::new();
        vars.insert("min_steps".to_string(), settings.roadmap.target_min_steps.to_string());
        vars.insert("max_steps".to_string(), settings.roadmap.target_max_steps.to_string());

        let members = build_members(settings, credentials, &prompts, &vars, &model)?;

        // {{date}} is left in place here, even over a configured `date` variable,
        // and rendered on every team run.
        let mut team_vars = vars.clone();
        team_vars.insert("date".to_string(), "{{date}}".to_string());

        let mut team = Team::new("roadmap-team", model.clone())
            .with_description(&prompts.render_with_custom(&prompts.team.description, &team_vars))
            .with_instructions(&prompts.render_with_custom(&prompts.team.instructions, &team_vars))
            .with_max_iterations(settings.llm.max_iterations)
            .with_temperature(settings.llm.temperature);
        for member in members {
            team = team.with_member(member);
        }

        info!(
            "Initialized {} with model {} and {} member(s)",
            team.name(),
            model.model_id(),
            team.members().len()
        );

        let service = RoadmapService::new(team, settings.roadmap.clone())?;
        Ok(Self::from_parts(settings.clone(), service))
    }

    /// Assemble from an already-built service.
    pub fn from_parts(settings: Settings, service: RoadmapService) -> Self {
        Self { settings, service }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn service(&self) -> &RoadmapService {
        &self.service
    }
}

fn build_members(
    settings: &Settings,
    credentials: &Credentials,
    prompts: &Prompts,
    vars: &HashMap<String, String>,
    model: &SharedChatModel,
) -> Result<Vec<Arc<Agent>>> {
    let specialist = |name: &str, description: &str, instructions: &str| {
        Agent::new(name, model.clone())
            .with_description(description)
            .with_instructions(&prompts.render_with_custom(instructions, vars))
            .with_max_iterations(settings.llm.max_iterations)
            .with_max_results(settings.search.max_results)
            .with_temperature(settings.llm.temperature)
    };

    let mut members = vec![Arc::new(specialist(
        "planner",
        "Outlines the learning steps for a topic",
        &prompts.members.planner,
    ))];

    if settings.search.tavily.enabled {
        let key = credentials.tavily_api_key.as_deref().ok_or_else(|| {
            CodemapError::MissingCredential(settings.search.tavily.api_key_env.clone())
        })?;
        let tool: SharedSearchTool = Arc::new(TavilySearch::from_settings(&settings.search, key)?);
        members.push(Arc::new(
            specialist(
                "blogs",
                "Finds blogs, tutorials and GitHub repositories",
                &prompts.members.blogs,
            )
            .with_capability(tool),
        ));
    }

    if settings.search.youtube.enabled {
        let key = credentials.youtube_api_key.as_deref().ok_or_else(|| {
            CodemapError::MissingCredential(settings.search.youtube.api_key_env.clone())
        })?;
        let tool: SharedSearchTool = Arc::new(YoutubeSearch::from_settings(&settings.search, key)?);
        members.push(Arc::new(
            specialist("videos", "Finds YouTube videos", &prompts.members.videos)
                .with_capability(tool),
        ));
    }

    if settings.search.web.enabled {
        let tool: SharedSearchTool = Arc::new(DuckDuckGoSearch::from_settings(&settings.search)?);
        members.push(Arc::new(
            specialist(
                "web",
                "Finds official documentation and reference pages",
                &prompts.members.web,
            )
            .with_capability(tool),
        ));
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedModel;
    use crate::tools::Capability;

    fn all_keys(name: &str) -> Option<String> {
        Some(format!("{}-value", name.to_lowercase()))
    }

    #[test]
    fn test_initialize_fails_without_llm_key() {
        let settings = Settings::default();
        let result = AppContext::initialize(&settings, |name: &str| {
            (name != "GEMINI_API_KEY").then(|| "key".to_string())
        });
        match result {
            Err(CodemapError::MissingCredential(name)) => assert_eq!(name, "GEMINI_API_KEY"),
            Err(e) => panic!("Unexpected error: {e}"),
            Ok(_) => panic!("Expected a missing credential"),
        }
    }

    #[test]
    fn test_initialize_fails_on_empty_search_key() {
        let settings = Settings::default();
        let result = AppContext::initialize(&settings, |name: &str| {
            if name == "YOUTUBE_API_KEY" {
                Some("   ".to_string())
            } else {
                Some("key".to_string())
            }
        });
        assert!(matches!(
            result,
            Err(CodemapError::MissingCredential(n)) if n == "YOUTUBE_API_KEY"
        ));
    }

    #[test]
    fn test_initialize_builds_default_team() {
        let context = AppContext::initialize(&Settings::default(), all_keys).unwrap();
        let team = context.service().team();

        let names: Vec<&str> = team.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["planner", "blogs", "videos"]);
        assert!(team.member("planner").unwrap().capability().is_none());
        assert_eq!(
            team.member("blogs").unwrap().capability(),
            Some(Capability::CuratedSearch)
        );
        assert!(!context.service().checks_links());
    }

    #[test]
    fn test_members_follow_settings() {
        let mut settings = Settings::default();
        settings.search.tavily.enabled = false;
        settings.search.web.enabled = true;
        settings.roadmap.check_links = true;

        // Disabled capabilities need no key.
        let context = AppContext::initialize(&settings, |name: &str| {
            (name != "TAVILY_API_KEY").then(|| "key".to_string())
        })
        .unwrap();

        let names: Vec<&str> = context
            .service()
            .team()
            .members()
            .iter()
            .map(|m| m.name())
            .collect();
        assert_eq!(names, vec!["planner", "videos", "web"]);
        assert!(context.service().checks_links());
    }

    #[test]
    fn test_default_prompt_targets_seven_to_eight_steps() {
        let settings = Settings::default();
        let credentials = Credentials::load_with(&settings, all_keys).unwrap();
        let model = Arc::new(ScriptedModel::fixed("scripted", "{}"));

        let context = AppContext::with_model(&settings, &credentials, model).unwrap();
        let prompt = context.service().team().system_prompt();

        assert!(prompt.contains("with 7 to 8 steps"));
        assert!(!prompt.contains("{{"));

        let planner = context.service().team().member("planner").unwrap();
        assert!(planner.instructions().contains("Outline 7 to 8 learning steps"));
    }

    #[test]
    fn test_configured_date_variable_does_not_pin_the_date() {
        let mut settings = Settings::default();
        settings.prompts.variables.insert("date".to_string(), "1999-12-31".to_string());
        let credentials = Credentials::load_with(&settings, all_keys).unwrap();
        let model = Arc::new(ScriptedModel::fixed("scripted", "{}"));

        let context = AppContext::with_model(&settings, &credentials, model).unwrap();
        let prompt = context.service().team().system_prompt();

        assert!(!prompt.contains("1999-12-31"));
        assert!(prompt.contains("Today is 20"));
    }
}
