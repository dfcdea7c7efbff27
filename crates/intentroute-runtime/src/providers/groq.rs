//! Groq provider implementation.
//!
//! Groq serves an OpenAI-compatible chat completion API. The instruction and
//! query travel as separate system and user messages.

use async_trait::async_trait;
use intentroute_core::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http::{build_client, endpoint, send_json};
use super::{
    factory::ProviderFactory, secrets::ApiCredential, ChatMessage, CompletionConfig,
    CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};

/// Groq chat completion provider.
pub struct GroqProvider {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GroqProvider {
    pub fn new(credential: ApiCredential, base_url: impl Into<String>) -> Result<Self, ProviderError> {
        if credential.is_empty() {
            return Err(ProviderError::NotConfigured(format!("{} is empty", credential)));
        }

        Ok(Self {
            credential,
            base_url: base_url.into(),
            client: build_client()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl LlmProvider for GroqProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = ChatCompletionRequest {
            model: &config.model,
            messages: &messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        // Only expose the credential here, at the point of use
        let builder = self
            .client
            .post(endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(self.credential.expose())
            .json(&request);

        let body: ChatCompletionResponse = send_json(builder, config.timeout).await?;

        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse("no choices returned".to_string()))?
            .message
            .content
            .unwrap_or_default();

        let usage = body
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: body.model.unwrap_or_else(|| config.model.clone()),
        })
    }

    fn name(&self) -> &str {
        "groq"
    }
}

/// Factory for Groq providers.
pub struct GroqProviderFactory;

impl ProviderFactory for GroqProviderFactory {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Groq
    }

    fn create(
        &self,
        config: &ProviderConfig,
        credential: ApiCredential,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(GroqProvider::new(credential, config.base_url.clone())?))
    }

    fn description(&self) -> &'static str {
        "Groq OpenAI-compatible chat completion provider"
    }
}
