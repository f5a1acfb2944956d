//! Aggregating agent that delegates to specialist members.

use super::runner::{run_tool_loop, Agent, AgentResponse, LoopConfig, ToolDispatch};
use super::tools::{delegate_tool_spec, is_known_tool, parse_tool_call, ToolCall};
use crate::config::Prompts;
use crate::error::{CodemapError, Result};
use crate::llm::{SharedChatModel, ToolInvocation};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// An agent whose only tool is delegating to its members.
///
/// Members are shared: the same `Arc<Agent>` can sit in several teams or be
/// run directly.
pub struct Team {
    name: String,
    description: String,
    model: SharedChatModel,
    members: Vec<Arc<Agent>>,
    instructions: String,
    max_iterations: usize,
    temperature: Option<f32>,
}

impl Team {
    /// Create a team with no members.
    pub fn new(name: &str, model: SharedChatModel) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            model,
            members: Vec::new(),
            instructions: String::new(),
            max_iterations: 10,
            temperature: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the instruction template. `{{date}}` is filled in on every run.
    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.instructions = instructions.to_string();
        self
    }

    /// Add a member. Order is preserved in the roster shown to the model.
    pub fn with_member(mut self, member: Arc<Agent>) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Arc<Agent>] {
        &self.members
    }

    /// Find a member by name, ignoring case.
    pub fn member(&self, name: &str) -> Option<&Arc<Agent>> {
        self.members
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(name.trim()))
    }

    /// System prompt for one run: description, rendered instructions, and roster.
    pub fn system_prompt(&self) -> String {
        let mut vars = HashMap::new();
        vars.insert(
            "date".to_string(),
            chrono::Local::now().format("%Y-%m-%d").to_string(),
        );
        let instructions = Prompts::render(&self.instructions, &vars);

        let mut prompt = String::new();
        if !self.description.is_empty() {
            prompt.push_str(self.description.trim());
            prompt.push_str("\n\n");
        }
        prompt.push_str(instructions.trim());

        if !self.members.is_empty() {
            prompt.push_str("\n\nTeam members:");
            for member in &self.members {
                let capability = member
                    .capability()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "instructions only".to_string());
                prompt.push_str(&format!(
                    "\n- {} ({}): {}",
                    member.name(),
                    capability,
                    member.description()
                ));
            }
        }

        prompt
    }

    /// Run the team on a topic.
    #[instrument(skip_all, fields(team = %self.name, topic = %topic))]
    pub async fn run(&self, topic: &str) -> Result<AgentResponse> {
        let tools = if self.members.is_empty() {
            Vec::new()
        } else {
            let names: Vec<&str> = self.members.iter().map(|m| m.name()).collect();
            vec![delegate_tool_spec(&names)]
        };

        run_tool_loop(
            LoopConfig {
                agent_name: &self.name,
                model: self.model.as_ref(),
                system_prompt: self.system_prompt(),
                tools,
                temperature: self.temperature,
                max_iterations: self.max_iterations,
            },
            topic,
            self,
        )
        .await
    }
}

#[async_trait]
impl ToolDispatch for Team {
    async fn dispatch(&self, call: &ToolInvocation) -> Result<String> {
        if !is_known_tool(&call.name) {
            return Err(CodemapError::Agent(format!(
                "{} requested unknown tool '{}'",
                self.name, call.name
            )));
        }

        match parse_tool_call(&call.name, &call.arguments) {
            Ok(ToolCall::Delegate { member, task }) => {
                let Some(agent) = self.member(&member) else {
                    let available: Vec<&str> = self.members.iter().map(|m| m.name()).collect();
                    return Ok(format!(
                        "Tool error: unknown team member '{}'. Available: {}",
                        member,
                        available.join(", ")
                    ));
                };

                info!("{} delegating to {}", self.name, agent.name());
                let response = agent.run(&task).await?;
                Ok(response.content)
            }
            Ok(ToolCall::Search { .. }) => Ok(format!(
                "Tool error: {} cannot search directly; delegate to a member instead",
                self.name
            )),
            Err(e) => Ok(format!("Failed to parse tool call: {}", e)),
        }
    }
}
