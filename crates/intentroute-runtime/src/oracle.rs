//! Classification oracle adapter.
//!
//! Turns an instruction and a query into exactly one remote call, shaped
//! the way the provider family expects, and normalizes the answer. The
//! answer is not checked against the known labels here.

use std::sync::Arc;
use std::time::Duration;

use intentroute_core::{ProviderKind, RequestShape};
use tracing::debug;

use crate::prompts::single_prompt;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};

/// One provider's view of the classification task.
pub struct ClassificationOracle {
    kind: ProviderKind,
    provider: Arc<dyn LlmProvider>,
    default_model: String,
    timeout: Duration,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for ClassificationOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationOracle")
            .field("kind", &self.kind)
            .field("provider", &self.provider.name())
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl ClassificationOracle {
    pub fn new(
        kind: ProviderKind,
        provider: Arc<dyn LlmProvider>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            provider,
            default_model: default_model.into(),
            timeout: Duration::from_secs(30),
            max_tokens: None,
        }
    }

    /// Bound each remote call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cap the completion length.
    ///
    /// Ignored for single-prompt providers, whose reasoning tokens count
    /// against the cap and can leave the visible answer empty.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// The messages sent for one query.
    pub fn messages(&self, instruction: &str, query: &str) -> Vec<ChatMessage> {
        match self.kind.request_shape() {
            RequestShape::ChatCompletion => vec![
                ChatMessage::system(instruction),
                ChatMessage::user(query),
            ],
            RequestShape::SinglePrompt => vec![ChatMessage::user(single_prompt(instruction, query))],
        }
    }

    fn completion_config(&self, model: &str) -> CompletionConfig {
        let max_tokens = match self.kind.request_shape() {
            RequestShape::ChatCompletion => self.max_tokens,
            RequestShape::SinglePrompt => None,
        };

        CompletionConfig {
            model: model.to_string(),
            max_tokens,
            temperature: 0.0,
            timeout: self.timeout,
        }
    }

    /// Ask the oracle for a label.
    ///
    /// Returns the answer trimmed and uppercased. `model` falls back to the
    /// provider default.
    pub async fn classify(
        &self,
        instruction: &str,
        query: &str,
        model: Option<&str>,
    ) -> Result<String, ProviderError> {
        let model = model.unwrap_or(&self.default_model);
        let config = self.completion_config(model);

        let response = self
            .provider
            .complete(self.messages(instruction, query), &config)
            .await?;

        debug!(
            provider = %self.kind,
            model = %model,
            raw = %response.content,
            tokens = response.usage.total(),
            "Oracle answered"
        );

        Ok(response.content.trim().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CompletionResponse, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what it was asked and answers with a fixed text.
    struct RecordingProvider {
        answer: String,
        seen: Mutex<Vec<(Vec<ChatMessage>, CompletionConfig)>>,
    }

    impl RecordingProvider {
        fn new(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            self.seen.lock().unwrap().push((messages, config.clone()));
            Ok(CompletionResponse {
                content: self.answer.clone(),
                usage: TokenUsage::default(),
                model: config.model.clone(),
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn chat_completion_sends_system_and_user() {
        let provider = RecordingProvider::new("  faq \n");
        let oracle = ClassificationOracle::new(ProviderKind::Groq, provider.clone(), "llama")
            .with_max_tokens(Some(16));

        let label = oracle.classify("Rules.", "What are your hours?", None).await.unwrap();
        assert_eq!(label, "FAQ");

        let seen = provider.seen.lock().unwrap();
        let (messages, config) = &seen[0];
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_system());
        assert_eq!(messages[1].content, "What are your hours?");
        assert_eq!(config.model, "llama");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, Some(16));
    }

    #[tokio::test]
    async fn single_prompt_folds_instruction() {
        let provider = RecordingProvider::new("Order");
        let oracle = ClassificationOracle::new(ProviderKind::Google, provider.clone(), "gemini")
            .with_max_tokens(Some(16));

        let label = oracle
            .classify("Rules.", "Where is 101?", Some("gemini-pro"))
            .await
            .unwrap();
        assert_eq!(label, "ORDER");

        let seen = provider.seen.lock().unwrap();
        let (messages, config) = &seen[0];
        assert_eq!(messages, &vec![ChatMessage::user("Rules.\n\nUser query: Where is 101?")]);
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.max_tokens, None);
    }

    #[tokio::test]
    async fn unknown_text_is_passed_through() {
        let oracle =
            ClassificationOracle::new(ProviderKind::Groq, RecordingProvider::new("faq."), "m");
        assert_eq!(oracle.classify("Rules.", "q", None).await.unwrap(), "FAQ.");
    }
}
