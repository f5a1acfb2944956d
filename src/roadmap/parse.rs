//! Extracting and validating roadmap JSON from model output.

use super::{Roadmap, StepId};
use crate::config::RoadmapSettings;
use crate::error::{CodemapError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

fn code_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)\s*```$").expect("Invalid regex")
    })
}

/// Pull the JSON object out of a model reply.
///
/// Strips surrounding whitespace and a markdown code fence, then returns the
/// span from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    let inner = match code_fence().captures(trimmed).and_then(|c| c.get(1)) {
        Some(m) => m.as_str(),
        None => trimmed,
    };

    match (inner.find('{'), inner.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&inner[start..=end]),
        _ => Err(CodemapError::InvalidRoadmap(
            "model output contains no JSON object".to_string(),
        )),
    }
}

/// Parse model output into a validated roadmap.
pub fn parse_roadmap(text: &str, settings: &RoadmapSettings) -> Result<Roadmap> {
    let json = extract_json(text)?;
    let roadmap: Roadmap = serde_json::from_str(json)
        .map_err(|e| CodemapError::InvalidRoadmap(format!("does not match the schema: {}", e)))?;
    validate(&roadmap, settings)?;
    Ok(roadmap)
}

fn validate(roadmap: &Roadmap, settings: &RoadmapSettings) -> Result<()> {
    let count = roadmap.steps.len();
    if count < settings.min_steps || count > settings.max_steps {
        return Err(CodemapError::InvalidRoadmap(format!(
            "expected between {} and {} steps, got {}",
            settings.min_steps, settings.max_steps, count
        )));
    }

    let mut seen: HashSet<&StepId> = HashSet::new();
    for step in &roadmap.steps {
        if !seen.insert(&step.id) {
            return Err(CodemapError::InvalidRoadmap(format!(
                "duplicate step id {}",
                step.id
            )));
        }
        if step.title.trim().is_empty() {
            return Err(CodemapError::InvalidRoadmap(format!(
                "step {} has no title",
                step.id
            )));
        }
        if step.description.trim().is_empty() {
            return Err(CodemapError::InvalidRoadmap(format!(
                "step {} has no description",
                step.id
            )));
        }
        for resource in &step.resources {
            if !is_web_url(&resource.url) {
                return Err(CodemapError::InvalidRoadmap(format!(
                    "step {} has an invalid resource URL: {}",
                    step.id, resource.url
                )));
            }
        }
    }

    Ok(())
}

/// Absolute http(s) URL with a host.
fn is_web_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RoadmapSettings {
        RoadmapSettings {
            min_steps: 1,
            max_steps: 3,
            ..Default::default()
        }
    }

    const VALID: &str = r#"{"steps":[{"id":1,"title":"Basics","duration":"1 week","description":"Syntax and types","resources":[{"title":"Tutorial","url":"https://docs.python.org/3/tutorial/"},"[Video](https://www.youtube.com/watch?v=rfscVS0vtbw)"],"practice":["Write a calculator"]}]}"#;

    #[test]
    fn test_extract_plain_and_fenced() {
        assert_eq!(extract_json(VALID).unwrap(), VALID);

        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(extract_json(&fenced).unwrap(), VALID);

        let chatty = format!("Here is your roadmap:\n{}\nGood luck!", VALID);
        assert_eq!(extract_json(&chatty).unwrap(), VALID);
    }

    #[test]
    fn test_extract_without_object_fails() {
        let err = extract_json("I could not build a roadmap.").unwrap_err();
        assert!(matches!(err, CodemapError::InvalidRoadmap(_)));
    }

    #[test]
    fn test_parse_valid_roadmap() {
        let roadmap = parse_roadmap(VALID, &settings()).unwrap();
        assert_eq!(roadmap.steps.len(), 1);
        assert_eq!(roadmap.steps[0].resources.len(), 2);
        assert_eq!(roadmap.steps[0].resources[1].title, "Video");
        assert_eq!(roadmap.steps[0].practice, vec!["Write a calculator"]);
    }

    #[test]
    fn test_step_count_bounds() {
        let empty = r#"{"steps": []}"#;
        let err = parse_roadmap(empty, &settings()).unwrap_err();
        assert!(err.to_string().contains("between 1 and 3 steps, got 0"));

        let step = r#"{"id":N,"title":"t","description":"d"}"#;
        let steps: Vec<String> = (1..=4).map(|i| step.replace('N', &i.to_string())).collect();
        let many = format!(r#"{{"steps":[{}]}}"#, steps.join(","));
        assert!(parse_roadmap(&many, &settings()).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let text = r#"{"steps":[{"id":1,"title":"a","description":"d"},{"id":1,"title":"b","description":"d"}]}"#;
        let err = parse_roadmap(text, &settings()).unwrap_err();
        assert!(err.to_string().contains("duplicate step id 1"));
    }

    #[test]
    fn test_rejects_missing_description() {
        let text = r#"{"steps":[{"id":"intro","title":"Intro","description":"  "}]}"#;
        let err = parse_roadmap(text, &settings()).unwrap_err();
        assert!(err.to_string().contains("step intro has no description"));
    }

    #[test]
    fn test_rejects_relative_or_non_web_urls() {
        for url in ["/docs/intro", "ftp://example.com/file", "not a url"] {
            let text = format!(
                r#"{{"steps":[{{"id":1,"title":"t","description":"d","resources":[{{"title":"x","url":"{}"}}]}}]}}"#,
                url
            );
            let err = parse_roadmap(&text, &settings()).unwrap_err();
            assert!(matches!(err, CodemapError::InvalidRoadmap(_)), "{url}");
        }
    }

    #[test]
    fn test_rejects_wrong_schema() {
        let err = parse_roadmap(r#"{"roadmap": "learn it"}"#, &settings()).unwrap_err();
        assert!(err.to_string().contains("does not match the schema"));
    }
}
