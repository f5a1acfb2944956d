//! OpenAI-compatible chat model.

use super::{ChatMessage, ChatModel, ChatReply, ChatRequest, ToolInvocation, ToolSpec};
use crate::config::LlmSettings;
use crate::error::{CodemapError, Result};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chat model backed by any endpoint speaking the OpenAI chat completions API.
pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatModel {
    /// Create a model from an existing client.
    pub fn new(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    /// Create a model from LLM settings and an API key.
    pub fn from_settings(settings: &LlmSettings, api_key: &str) -> Result<Self> {
        let client = create_client(
            &settings.api_base,
            api_key,
            Duration::from_secs(settings.timeout_secs),
        )?;
        Ok(Self::new(client, &settings.model))
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(model = %self.model, messages = request.messages.len())
    )]
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        let messages = request
            .messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages);
        if !request.tools.is_empty() {
            args.tools(request.tools.iter().map(to_tool).collect::<Vec<_>>());
        }
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }
        let completion_request = args.build().map_err(|e| CodemapError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(completion_request)
            .await
            .map_err(|e| CodemapError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CodemapError::OpenAI("No choices in model response".to_string()))?;

        let tool_calls: Vec<ToolInvocation> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolInvocation {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();

        debug!("Model replied with {} tool call(s)", tool_calls.len());

        Ok(ChatReply {
            content: choice.message.content,
            tool_calls,
        })
    }
}

fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let built: ChatCompletionRequestMessage = match message {
        ChatMessage::System { content } => ChatCompletionRequestSystemMessageArgs::default()
            .content(content.clone())
            .build()
            .map_err(|e| CodemapError::Agent(e.to_string()))?
            .into(),
        ChatMessage::User { content } => ChatCompletionRequestUserMessageArgs::default()
            .content(content.clone())
            .build()
            .map_err(|e| CodemapError::Agent(e.to_string()))?
            .into(),
        ChatMessage::Assistant {
            content,
            tool_calls,
        } => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(text) = content {
                args.content(text.clone());
            }
            if !tool_calls.is_empty() {
                args.tool_calls(
                    tool_calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.clone(),
                            },
                        })
                        .collect::<Vec<_>>(),
                );
            }
            args.build()
                .map_err(|e| CodemapError::Agent(e.to_string()))?
                .into()
        }
        ChatMessage::Tool { call_id, content } => ChatCompletionRequestToolMessageArgs::default()
            .tool_call_id(call_id.clone())
            .content(content.clone())
            .build()
            .map_err(|e| CodemapError::Agent(e.to_string()))?
            .into(),
    };
    Ok(built)
}

fn to_tool(spec: &ToolSpec) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: spec.name.clone(),
            description: Some(spec.description.clone()),
            parameters: Some(spec.parameters.clone()),
            strict: None,
        },
    }
}
