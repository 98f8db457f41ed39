//! Chat completion client for any OpenAI-compatible endpoint.
//!
//! Requests go to `{base_url}/chat/completions` through `async-openai`. A call
//! is attempted exactly once; failures surface to the caller.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use backoff::ExponentialBackoffBuilder;
use futures::{
    stream::{self, BoxStream},
    StreamExt,
};
use log::{debug, error, info};

use crate::config::LlmConfig;
use crate::error::{PlannerError, Result};
use crate::models::conversation::{ConversationMessage, Role};

const SERVICE: &str = "LLM";

pub struct LlmService {
    client: Client<OpenAIConfig>,
    config: LlmConfig,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlannerError::Config(format!("failed to build LLM client: {}", e)))?;

        let openai_config = OpenAIConfig::new()
            .with_api_base(config.base_url.clone())
            .with_api_key(config.api_key.clone().unwrap_or_default());

        // Rate-limited responses are final too.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(no_retry);

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Sends a single system prompt and returns the generated text.
    pub async fn complete_prompt(&self, prompt: &str) -> Result<String> {
        self.complete(&[ConversationMessage::system(prompt)]).await
    }

    pub async fn complete(&self, messages: &[ConversationMessage]) -> Result<String> {
        let request = self.request(messages)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            error!("Failed to prompt {}: {}", SERVICE, e);
            from_openai(e)
        })?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PlannerError::Service {
                service: SERVICE,
                status: None,
                message: "response contained no message".to_string(),
            })?;

        info!("LLM returned {} characters", text.chars().count());
        Ok(text)
    }

    /// Streams the reply as text fragments in arrival order.
    ///
    /// A failure before the first chunk is returned as the error of the call
    /// itself, so callers can still answer with a plain error response.
    pub async fn complete_stream(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let request = self.request(messages)?;

        let mut chunks = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(from_openai)?;

        let first = match chunks.next().await {
            Some(Err(e)) => {
                error!("{} stream failed before the first chunk: {}", SERVICE, e);
                return Err(from_openai(e));
            }
            first => first,
        };

        let fragments = stream::iter(first)
            .chain(chunks)
            .filter_map(|chunk| async move {
                match chunk {
                    Ok(chunk) => chunk
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.delta.content)
                        .filter(|content| !content.is_empty())
                        .map(Ok),
                    Err(e) => Some(Err(from_openai(e))),
                }
            });

        Ok(fragments.boxed())
    }

    fn request(&self, messages: &[ConversationMessage]) -> Result<CreateChatCompletionRequest> {
        if !self.is_configured() {
            return Err(PlannerError::Config("OPENAI_API_KEY not set".to_string()));
        }

        let messages = messages
            .iter()
            .map(request_message)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_openai)?;

        debug!(
            "Sending {} message(s) to {} ({})",
            messages.len(),
            self.config.base_url,
            self.config.model
        );

        CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature)
            .build()
            .map_err(from_openai)
    }
}

fn request_message(
    message: &ConversationMessage,
) -> std::result::Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = message.content.clone();
    Ok(match message.role {
        Role::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    })
}

fn from_openai(err: OpenAIError) -> PlannerError {
    match err {
        OpenAIError::Reqwest(e) => PlannerError::from_reqwest(SERVICE, e),
        OpenAIError::ApiError(e) => PlannerError::Service {
            service: SERVICE,
            status: None,
            message: e.message,
        },
        other => PlannerError::Service {
            service: SERVICE,
            status: None,
            message: other.to_string(),
        },
    }
}
