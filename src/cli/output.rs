//! CLI output formatting utilities.

use crate::roadmap::{LinkReport, RoadmapStep};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print one roadmap step with its resources and exercises.
    pub fn roadmap_step(step: &RoadmapStep) {
        let duration = if step.duration.is_empty() {
            String::new()
        } else {
            format!(" ({})", step.duration)
        };
        println!(
            "\n{} {}{}",
            style(format!("{}.", step.id)).cyan().bold(),
            style(&step.title).bold(),
            style(duration).dim()
        );
        println!("   {}", step.description);
        for resource in &step.resources {
            println!(
                "   {} {} {}",
                style("-").cyan(),
                resource.title,
                style(&resource.url).dim()
            );
        }
        for exercise in &step.practice {
            println!("   {} {}", style("~").green(), exercise);
        }
    }

    /// Summarize a link check.
    pub fn link_report(report: &LinkReport) {
        if report.is_clean() {
            Output::success(&format!("All {} links are live", report.checked));
            return;
        }
        Output::warning(&format!(
            "Removed {} broken of {} checked links",
            report.broken.len(),
            report.checked
        ));
        for link in &report.broken {
            eprintln!("   {} {}", style(&link.url).dim(), link.reason);
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
