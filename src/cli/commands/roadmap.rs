//! Roadmap command - generate one roadmap from the terminal.

use crate::app::AppContext;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Generate a roadmap for `topic` and print it.
pub async fn run_roadmap(
    topic: &str,
    model: Option<String>,
    check_links: bool,
    json: bool,
    mut settings: Settings,
) -> Result<()> {
    if let Some(model) = model {
        settings.llm.model = model;
    }
    if check_links {
        settings.roadmap.check_links = true;
    }

    let context = match AppContext::from_env(&settings) {
        Ok(context) => context,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'codemap doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let spinner = Output::spinner(&format!("Building a roadmap for '{}'...", topic.trim()));
    let output = match context.service().generate(topic).await {
        Ok(output) => {
            spinner.finish_and_clear();
            output
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Roadmap generation failed: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", output.body);
        return Ok(());
    }

    Output::header(&format!("Roadmap: {}", topic.trim()));
    for step in &output.roadmap.steps {
        Output::roadmap_step(step);
    }
    println!();

    if let Some(report) = &output.links {
        Output::link_report(report);
    }

    Ok(())
}
