//! Chat-completion boundary
//!
//! `ChatService` is the seam the pipeline talks through; `LlmClient` is the
//! production implementation over an OpenAI-compatible endpoint. Tests (and
//! anything that wants deterministic conversions) provide their own
//! implementation.

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::info;

use crate::error::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// One round trip to a text-generation service.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: Option<String>, model: String, temperature: f32) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = base_url {
            config = config.with_api_base(url);
        }
        let client = Client::with_config(config);
        Self {
            client,
            model,
            temperature,
        }
    }

    /// Model identifier requests are sent with.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatService for LlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        info!("🤖 Sending request to LLM (Model: {})...", self.model);

        let mut request_messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(messages.len());
        for message in messages {
            let built = match message.role {
                ChatRole::System => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(message.content.as_str())
                        .build()
                        .map_err(|e| LlmError::Request(e.to_string()))?,
                ),
                ChatRole::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(message.content.as_str())
                        .build()
                        .map_err(|e| LlmError::Request(e.to_string()))?,
                ),
            };
            request_messages.push(built);
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(request_messages)
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        info!("🤖 LLM Response received.");

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod llm_tests;
