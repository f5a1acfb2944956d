//! Specialist agent and the shared tool-calling loop.

use super::tools::{is_known_tool, parse_tool_call, search_tool_spec, ToolCall};
use crate::error::{CodemapError, Result};
use crate::llm::{ChatMessage, ChatModel, ChatRequest, SharedChatModel, ToolInvocation, ToolSpec};
use crate::tools::{format_hits, Capability, SharedSearchTool};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Executes tool calls requested during a loop.
///
/// `Ok` text is handed back to the model; `Err` aborts the run.
#[async_trait]
pub(crate) trait ToolDispatch: Send + Sync {
    async fn dispatch(&self, call: &ToolInvocation) -> Result<String>;
}

/// Parameters of one tool-calling loop.
pub(crate) struct LoopConfig<'a> {
    pub agent_name: &'a str,
    pub model: &'a dyn ChatModel,
    pub system_prompt: String,
    pub tools: Vec<ToolSpec>,
    pub temperature: Option<f32>,
    pub max_iterations: usize,
}

/// Call the model until it answers without requesting tools.
pub(crate) async fn run_tool_loop(
    config: LoopConfig<'_>,
    input: &str,
    dispatcher: &dyn ToolDispatch,
) -> Result<AgentResponse> {
    let mut messages = vec![
        ChatMessage::system(config.system_prompt),
        ChatMessage::user(input),
    ];

    let mut iterations = 0;
    let mut tool_calls_made = Vec::new();

    loop {
        iterations += 1;
        if iterations > config.max_iterations {
            return Err(CodemapError::Agent(format!(
                "{} exceeded maximum iterations ({})",
                config.agent_name, config.max_iterations
            )));
        }

        debug!("{} iteration {}", config.agent_name, iterations);

        let reply = config
            .model
            .chat(ChatRequest {
                messages: messages.clone(),
                tools: config.tools.clone(),
                temperature: config.temperature,
            })
            .await?;

        if reply.tool_calls.is_empty() {
            return Ok(AgentResponse {
                content: reply.content.unwrap_or_default(),
                tool_calls: tool_calls_made,
                iterations,
            });
        }

        messages.push(ChatMessage::Assistant {
            content: reply.content.clone(),
            tool_calls: reply.tool_calls.clone(),
        });

        for call in &reply.tool_calls {
            info!(
                "{} calling tool: {} with args: {}",
                config.agent_name, call.name, call.arguments
            );

            let result = dispatcher.dispatch(call).await?;
            messages.push(ChatMessage::tool(call.id.clone(), result.clone()));

            tool_calls_made.push(ToolCallRecord {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
                result,
            });
        }
    }
}

/// A specialist: one model, optional search capability, fixed instructions.
pub struct Agent {
    name: String,
    description: String,
    model: SharedChatModel,
    capability: Option<SharedSearchTool>,
    instructions: String,
    max_iterations: usize,
    max_results: usize,
    temperature: Option<f32>,
}

impl Agent {
    /// Create an instruction-only agent.
    pub fn new(name: &str, model: SharedChatModel) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            model,
            capability: None,
            instructions: String::new(),
            max_iterations: 10,
            max_results: 5,
            temperature: None,
        }
    }

    /// Set the one-line description shown to a team.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the instruction text sent as the system prompt.
    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.instructions = instructions.to_string();
        self
    }

    /// Attach a search capability.
    pub fn with_capability(mut self, tool: SharedSearchTool) -> Self {
        self.capability = Some(tool);
        self
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the default number of search results per call.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// The attached capability, if any.
    pub fn capability(&self) -> Option<Capability> {
        self.capability.as_ref().map(|tool| tool.capability())
    }

    /// Run the agent on a query.
    #[instrument(skip_all, fields(agent = %self.name, query = %query))]
    pub async fn run(&self, query: &str) -> Result<AgentResponse> {
        let tools = match &self.capability {
            Some(tool) => vec![search_tool_spec(tool.as_ref(), self.max_results)],
            None => Vec::new(),
        };

        let response = run_tool_loop(
            LoopConfig {
                agent_name: &self.name,
                model: self.model.as_ref(),
                system_prompt: self.instructions.clone(),
                tools,
                temperature: self.temperature,
                max_iterations: self.max_iterations,
            },
            query,
            self,
        )
        .await?;

        debug!(
            "{} finished after {} iteration(s), {} tool call(s)",
            self.name,
            response.iterations,
            response.tool_calls.len()
        );
        Ok(response)
    }
}

#[async_trait]
impl ToolDispatch for Agent {
    async fn dispatch(&self, call: &ToolInvocation) -> Result<String> {
        let tool = self.capability.as_ref().ok_or_else(|| {
            CodemapError::Agent(format!(
                "{} has no tools but the model requested '{}'",
                self.name, call.name
            ))
        })?;

        if !is_known_tool(&call.name) {
            return Err(CodemapError::Agent(format!(
                "{} requested unknown tool '{}'",
                self.name, call.name
            )));
        }

        match parse_tool_call(&call.name, &call.arguments) {
            Ok(ToolCall::Search { query, limit }) => {
                let limit = limit.unwrap_or(self.max_results).clamp(1, 20);
                let hits = tool.search(&query, limit).await?;
                Ok(format_hits(&hits))
            }
            Ok(ToolCall::Delegate { .. }) => Ok(format!(
                "Tool error: {} cannot delegate tasks",
                self.name
            )),
            Err(e) => Ok(format!("Failed to parse tool call: {}", e)),
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
