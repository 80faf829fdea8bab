use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequest,
    },
    Client as OpenAIClient,
};
use async_trait::async_trait;
use futures::StreamExt;
use log::debug;

use super::backend::{GenerationBackend, TokenStream};
use super::prompt::PromptRequest;
use crate::config::RelayConfig;
use crate::error::UpstreamError;

/// Chat-completions backend for OpenAI-compatible endpoints.
pub struct OpenAiBackend {
    client: OpenAIClient<OpenAIConfig>,
    model: String,
    max_tokens: Option<u32>,
}

impl OpenAiBackend {
    pub fn new(config: &RelayConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key.clone());
        if let Some(api_base) = &config.api_base {
            openai_config = openai_config.with_api_base(api_base.clone());
        }
        Self {
            client: OpenAIClient::with_config(openai_config),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    fn chat_request(&self, prompt: &PromptRequest) -> CreateChatCompletionRequest {
        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: prompt.system.clone().into(),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: prompt.user.clone().into(),
                name: None,
            }),
        ];

        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages,
            stream: Some(true),
            max_completion_tokens: self.max_tokens,
            ..Default::default()
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn open(&self, prompt: &PromptRequest) -> Result<TokenStream, UpstreamError> {
        debug!("Opening completion stream with model {}", self.model);
        let stream = self.client.chat().create_stream(self.chat_request(prompt)).await?;

        let tokens = stream.filter_map(|item| async move {
            match item {
                Ok(response) => response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .filter(|content| !content.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(UpstreamError::from(e))),
            }
        });

        Ok(tokens.boxed())
    }
}
