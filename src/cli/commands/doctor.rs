//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::{load_dotenv, mask, Credentials, Prompts, Settings};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Codemap Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    load_dotenv(settings.env_file().as_deref());

    let mut checks = Vec::new();

    println!("{}", style("API Keys").bold());
    let key_checks = check_credentials(settings, |name| std::env::var(name).ok());
    for check in &key_checks {
        check.print();
    }
    checks.extend(key_checks);

    println!();

    println!("{}", style("Team").bold());
    Output::kv("Model", &format!("{} @ {}", settings.llm.model, settings.llm.api_base));
    for member in team_members(settings) {
        Output::list_item(&member);
    }
    if settings.roadmap.check_links {
        Output::list_item("link checking enabled");
    }

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    let prompts_check = check_prompts(settings);
    prompts_check.print();
    checks.push(prompts_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. The server will refuse to start until they are fixed.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Codemap is ready to serve.");
    }

    Ok(())
}

/// Check every key the enabled components need.
fn check_credentials<F>(settings: &Settings, lookup: F) -> Vec<CheckResult>
where
    F: Fn(&str) -> Option<String>,
{
    Credentials::required_vars(settings)
        .iter()
        .map(|var| {
            let hint = format!("Set with: export {}='...' (or add it to .env)", var);
            match lookup(var) {
                Some(value) if !value.trim().is_empty() => {
                    CheckResult::ok(var, &format!("configured ({})", mask(value.trim())))
                }
                Some(_) => CheckResult::error(var, "empty", &hint),
                None => CheckResult::error(var, "not set", &hint),
            }
        })
        .collect()
}

/// Members the team will be built with.
fn team_members(settings: &Settings) -> Vec<String> {
    let mut members = vec!["planner (instructions only)".to_string()];
    if settings.search.tavily.enabled {
        members.push("blogs (Tavily)".to_string());
    }
    if settings.search.youtube.enabled {
        members.push("videos (YouTube)".to_string());
    }
    if settings.search.web.enabled {
        members.push("web (DuckDuckGo)".to_string());
    }
    members
}

/// Check if config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override defaults", config_path.display()),
        )
    }
}

/// Check that custom prompts, if configured, parse.
fn check_prompts(settings: &Settings) -> CheckResult {
    let Some(dir) = settings.prompts.custom_dir.as_deref() else {
        return CheckResult::ok("Prompts", "built-in");
    };

    match Prompts::load(Some(dir), None) {
        Ok(_) => CheckResult::ok("Prompts", dir),
        Err(e) => CheckResult::error(
            "Prompts",
            &e.to_string(),
            "Fix team.toml / members.toml in the custom prompts directory",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_credentials_checked_per_enabled_capability() {
        let settings = Settings::default();
        let results = check_credentials(&settings, |name: &str| match name {
            "GEMINI_API_KEY" => Some("AIzaSyExampleKey1234".to_string()),
            "TAVILY_API_KEY" => Some(" ".to_string()),
            _ => None,
        });

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, CheckStatus::Ok);
        assert_eq!(results[0].message, "configured (AIza...1234)");
        assert_eq!(results[1].message, "empty");
        assert_eq!(results[2].name, "YOUTUBE_API_KEY");
        assert_eq!(results[2].message, "not set");
    }

    #[test]
    fn test_disabled_capabilities_need_no_key() {
        let mut settings = Settings::default();
        settings.search.tavily.enabled = false;
        settings.search.youtube.enabled = false;
        settings.search.web.enabled = true;

        let results = check_credentials(&settings, |_: &str| Some("key-123456789".to_string()));
        assert_eq!(results.len(), 1);
        assert_eq!(
            team_members(&settings),
            vec!["planner (instructions only)", "web (DuckDuckGo)"]
        );
    }

    #[test]
    fn test_missing_config_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let check = check_config_file(&dir.path().join("config.toml"));
        assert_eq!(check.status, CheckStatus::Warning);
    }
}
