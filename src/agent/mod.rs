//! Agents that answer with the help of tools.
//!
//! An [`Agent`] is a specialist with at most one search capability. A
//! [`Team`] is an aggregator whose only tool is handing work to its member
//! agents; it collects their findings and writes the final answer.

mod runner;
mod team;
mod tools;

pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use team::Team;
pub use tools::{
    delegate_tool_spec, parse_tool_call, search_tool_spec, ToolCall, DELEGATE_TOOL, SEARCH_TOOL,
};
