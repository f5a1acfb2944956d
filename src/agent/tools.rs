//! Tool definitions and argument parsing for agents.

use crate::error::{CodemapError, Result};
use crate::llm::ToolSpec;
use crate::tools::SearchTool;

/// Name of the search function offered to specialists.
pub const SEARCH_TOOL: &str = "search";

/// Name of the delegation function offered to a team.
pub const DELEGATE_TOOL: &str = "delegate_task";

/// A parsed tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    /// Run the attached search capability.
    Search { query: String, limit: Option<usize> },

    /// Hand a task to a team member.
    Delegate { member: String, task: String },
}

/// Function definition for a specialist's search capability.
pub fn search_tool_spec(tool: &dyn SearchTool, default_limit: usize) -> ToolSpec {
    ToolSpec {
        name: SEARCH_TOOL.to_string(),
        description: tool.description().to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "limit": {
                    "type": "integer",
                    "description": format!(
                        "Maximum number of results (default: {})",
                        default_limit
                    ),
                    "default": default_limit
                }
            },
            "required": ["query"]
        }),
    }
}

/// Function definition for delegating to the named team members.
pub fn delegate_tool_spec(members: &[&str]) -> ToolSpec {
    ToolSpec {
        name: DELEGATE_TOOL.to_string(),
        description: "Delegate a task to one of your team members and receive their answer. \
            Describe the task precisely, including the topic."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "member": {
                    "type": "string",
                    "enum": members,
                    "description": "Name of the team member"
                },
                "task": {
                    "type": "string",
                    "description": "What the member should do"
                }
            },
            "required": ["member", "task"]
        }),
    }
}

/// Whether `name` is one of the functions agents are ever offered.
pub fn is_known_tool(name: &str) -> bool {
    matches!(name, SEARCH_TOOL | DELEGATE_TOOL)
}

/// Parse a tool call from the model's function name and JSON arguments.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        serde_json::from_str(arguments)
            .map_err(|e| CodemapError::Agent(format!("Invalid tool arguments: {}", e)))?
    };

    match name {
        SEARCH_TOOL => {
            let query = args["query"]
                .as_str()
                .filter(|q| !q.trim().is_empty())
                .ok_or_else(|| CodemapError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            let limit = args["limit"].as_u64().map(|l| l as usize);
            Ok(ToolCall::Search { query, limit })
        }
        DELEGATE_TOOL => {
            let member = args["member"]
                .as_str()
                .ok_or_else(|| CodemapError::Agent("Missing 'member' argument".to_string()))?
                .to_string();
            let task = args["task"]
                .as_str()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| CodemapError::Agent("Missing 'task' argument".to_string()))?
                .to_string();
            Ok(ToolCall::Delegate { member, task })
        }
        _ => Err(CodemapError::Agent(format!("Unknown tool: {}", name))),
    }
}
