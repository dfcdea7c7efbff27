//! LLM provider abstractions for intentroute-runtime.
//!
//! This module defines the transport trait for LLM providers and includes
//! implementations for Google Gemini and Groq.
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.
//! See [`ApiCredential`] for the recommended patterns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod factory;
pub mod secrets;

#[cfg(any(feature = "google", feature = "groq"))]
mod http;

#[cfg(feature = "google")]
mod google;

#[cfg(feature = "groq")]
mod groq;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use secrets::ApiCredential;

#[cfg(feature = "google")]
pub use google::{GoogleProvider, GoogleProviderFactory};

#[cfg(feature = "groq")]
pub use groq::{GroqProvider, GroqProviderFactory};

/// Errors from LLM providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate (provider default when unset)
    pub max_tokens: Option<u32>,

    /// Temperature (0.0 for deterministic)
    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: None,
            temperature: 0.0,
            timeout: Duration::from_secs(30),
        }
    }
}

/// A chat message for LLM completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// Response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Model that served the request
    pub model: String,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,

    /// Tokens in the completion
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Transport to a hosted model.
///
/// This is the only place where remote calls are made. Implementations do
/// not retry; a failed call is reported once to the caller.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Get provider name for logs.
    fn name(&self) -> &str;
}
