//! Topic in, validated roadmap JSON out.

use super::links::{LinkChecker, LinkReport};
use super::parse::{extract_json, parse_roadmap};
use super::Roadmap;
use crate::agent::Team;
use crate::config::RoadmapSettings;
use crate::error::{CodemapError, Result};
use tracing::{info, instrument};

/// Longest topic accepted, in characters.
pub const MAX_TOPIC_CHARS: usize = 200;

/// Runs the team and turns its answer into a roadmap.
pub struct RoadmapService {
    team: Team,
    settings: RoadmapSettings,
    link_checker: Option<LinkChecker>,
}

/// Result of one generation.
#[derive(Debug, Clone)]
pub struct RoadmapOutput {
    /// JSON body served to clients.
    pub body: String,
    pub roadmap: Roadmap,
    /// Present when links were checked.
    pub links: Option<LinkReport>,
}

impl RoadmapService {
    /// Create a service. Builds a link checker when `settings.check_links` is on.
    pub fn new(team: Team, settings: RoadmapSettings) -> Result<Self> {
        let link_checker = if settings.check_links {
            Some(LinkChecker::from_settings(&settings)?)
        } else {
            None
        };
        Ok(Self {
            team,
            settings,
            link_checker,
        })
    }

    /// Replace the link checker. `None` disables link checking.
    pub fn with_link_checker(mut self, checker: Option<LinkChecker>) -> Self {
        self.link_checker = checker;
        self
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn checks_links(&self) -> bool {
        self.link_checker.is_some()
    }

    /// Generate a roadmap for `topic`.
    ///
    /// Without link checking the body is the model's JSON text unchanged.
    /// With it, broken resources are dropped and the roadmap is re-serialized.
    #[instrument(skip(self))]
    pub async fn generate(&self, topic: &str) -> Result<RoadmapOutput> {
        let topic = validate_topic(topic)?;

        let response = self.team.run(topic).await?;
        info!(
            "Team answered after {} iteration(s), {} delegation(s)",
            response.iterations,
            response.tool_calls.len()
        );

        let json = extract_json(&response.content)?;
        let mut roadmap = parse_roadmap(json, &self.settings)?;

        let Some(checker) = &self.link_checker else {
            return Ok(RoadmapOutput {
                body: json.to_string(),
                roadmap,
                links: None,
            });
        };

        let report = checker.check(&roadmap).await;
        let removed = report.prune(&mut roadmap);
        if removed > 0 {
            info!("Removed {} broken resource(s)", removed);
        }
        let body = serde_json::to_string(&roadmap)?;

        Ok(RoadmapOutput {
            body,
            roadmap,
            links: Some(report),
        })
    }
}

/// Trim a topic and check it is usable.
pub fn validate_topic(topic: &str) -> Result<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(CodemapError::InvalidInput(
            "topic must not be empty".to_string(),
        ));
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(CodemapError::InvalidInput(format!(
            "topic must be at most {} characters",
            MAX_TOPIC_CHARS
        )));
    }
    Ok(topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatReply, ScriptedModel};
    use crate::test_support::spawn_server;
    use axum::{routing::get, Router};
    use std::sync::Arc;
    use std::time::Duration;

    fn roadmap_text(url: &str) -> String {
        format!(
            r#"{{"steps": [{{"id": 1, "title": "Basics", "duration": "3 days", "description": "Core syntax", "resources": [{{"title": "Guide", "url": "{}"}}], "practice": ["Build a CLI"]}}]}}"#,
            url
        )
    }

    fn service_replying(reply: String) -> (RoadmapService, Arc<ScriptedModel>) {
        let model = Arc::new(ScriptedModel::new("team", move |_| Ok(ChatReply::text(&reply))));
        let team = Team::new("roadmap-team", model.clone());
        let service = RoadmapService::new(team, RoadmapSettings::default()).unwrap();
        (service, model)
    }

    #[test]
    fn test_validate_topic() {
        assert_eq!(validate_topic("  rust  ").unwrap(), "rust");
        assert!(matches!(
            validate_topic("   "),
            Err(CodemapError::InvalidInput(_))
        ));
        assert!(validate_topic(&"x".repeat(MAX_TOPIC_CHARS)).is_ok());
        assert!(validate_topic(&"x".repeat(MAX_TOPIC_CHARS + 1)).is_err());
    }

    #[tokio::test]
    async fn test_body_is_model_json_verbatim() {
        let text = roadmap_text("https://doc.rust-lang.org/book/");
        let (service, model) = service_replying(format!("```json\n{}\n```", text));

        let output = service.generate(" rust ").await.unwrap();

        assert_eq!(output.body, text);
        assert!(output.links.is_none());
        assert_eq!(output.roadmap.steps[0].title, "Basics");
        assert_eq!(model.requests()[0].messages[1].text(), Some("rust"));
    }

    #[tokio::test]
    async fn test_invalid_output_is_rejected() {
        let (service, _) = service_replying("Sorry, I can't help with that.".to_string());
        let err = service.generate("rust").await.unwrap_err();
        assert!(matches!(err, CodemapError::InvalidRoadmap(_)));
    }

    #[tokio::test]
    async fn test_empty_topic_never_reaches_model() {
        let (service, model) = service_replying(roadmap_text("https://example.com"));
        let err = service.generate("").await.unwrap_err();
        assert!(matches!(err, CodemapError::InvalidInput(_)));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_link_check_prunes_and_reserializes() {
        let base = spawn_server(Router::new().route("/live", get(|| async { "ok" }))).await;
        let text = format!(
            r#"{{"steps": [{{"id": 1, "title": "Basics", "description": "Core", "resources": [{{"title": "Live", "url": "{base}/live"}}, {{"title": "Dead", "url": "{base}/dead"}}]}}]}}"#
        );
        let (service, _) = service_replying(text);
        let service = service
            .with_link_checker(Some(LinkChecker::new(Duration::from_secs(5), 2).unwrap()));

        let output = service.generate("rust").await.unwrap();

        let report = output.links.unwrap();
        assert_eq!(report.checked, 2);
        assert_eq!(report.broken.len(), 1);
        assert_eq!(output.roadmap.steps[0].resources.len(), 1);

        let body: serde_json::Value = serde_json::from_str(&output.body).unwrap();
        assert_eq!(body["steps"][0]["resources"][0]["title"], "Live");
        assert_eq!(body["steps"][0]["resources"].as_array().unwrap().len(), 1);
    }
}
