//! Stub transports shared by the router and evaluator tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use intentroute_core::{ProviderConfig, ProviderKind};
use tokio::time::Instant;

use crate::config::{ProviderOverrides, RuntimeConfig};
use crate::providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider,
    ProviderError, ProviderFactory, ProviderRegistry, TokenUsage,
};
use crate::router::Router;

type Responder = dyn Fn(&str) -> Result<String, ProviderError> + Send + Sync;

/// Answers every completion through a closure over the last message.
pub struct StubProvider {
    respond: Box<Responder>,
    calls: AtomicUsize,
    starts: Mutex<Vec<Instant>>,
}

impl StubProvider {
    pub fn new(
        respond: impl Fn(&str) -> Result<String, ProviderError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            starts: Mutex::new(Vec::new()),
        })
    }

    /// Always answers with `answer`.
    pub fn answering(answer: &'static str) -> Arc<Self> {
        Self::new(move |_| Ok(answer.to_string()))
    }

    /// Always fails as a transport error would.
    pub fn failing() -> Arc<Self> {
        Self::new(|_| Err(ProviderError::HttpError("connection refused".to_string())))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> Vec<Instant> {
        self.starts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.starts.lock().unwrap().push(Instant::now());

        let query = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        let content = (self.respond)(query)?;

        Ok(CompletionResponse {
            content,
            usage: TokenUsage::default(),
            model: config.model.clone(),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Hands out one shared stub and counts how often it was asked to.
pub struct StubFactory {
    kind: ProviderKind,
    provider: Arc<StubProvider>,
    created: AtomicUsize,
}

impl StubFactory {
    pub fn new(kind: ProviderKind, provider: Arc<StubProvider>) -> Arc<Self> {
        Arc::new(Self {
            kind,
            provider,
            created: AtomicUsize::new(0),
        })
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ProviderFactory for StubFactory {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn create(
        &self,
        _config: &ProviderConfig,
        _credential: ApiCredential,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let provider: Arc<dyn LlmProvider> = self.provider.clone();
        Ok(provider)
    }

    fn description(&self) -> &'static str {
        "Stub provider for tests"
    }
}

/// Settings that read each provider's key from a test-specific variable.
///
/// The variable for `kind` is `{prefix}_{KIND}`; callers set it when the
/// credential should be present.
pub fn isolated_config(prefix: &str) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    for kind in ProviderKind::ALL {
        config.providers.insert(
            kind,
            ProviderOverrides {
                api_key_env: Some(key_var(prefix, kind)),
                ..Default::default()
            },
        );
    }
    config
}

pub fn key_var(prefix: &str, kind: ProviderKind) -> String {
    format!("{}_{}", prefix, kind.name().to_uppercase())
}

/// A router whose only transport is `factory`, with its credential set.
pub fn stub_router(prefix: &str, factory: Arc<StubFactory>) -> Router {
    std::env::set_var(key_var(prefix, factory.kind()), "test-key");
    let mut registry = ProviderRegistry::new();
    registry.register(factory);
    Router::new(registry, isolated_config(prefix))
}
