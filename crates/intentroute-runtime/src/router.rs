//! The intent router.
//!
//! A [`Router`] owns at most one provider session. Initializing it resolves
//! the provider, loads its credential and builds a transport; classifying
//! asks the oracle for a label and reports the answer as a [`RouteOutcome`].
//!
//! Remote failures never escape `classify`: they become
//! [`RouteOutcome::Failed`] and are logged. Only misuse of the router
//! itself (no session) is an error.

use intentroute_core::{ProviderConfig, ProviderKind, RouteOutcome};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::oracle::ClassificationOracle;
use crate::prompts::SYSTEM_INSTRUCTION;
use crate::providers::ProviderRegistry;

/// Errors from the router.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Unknown provider, missing credential or unusable settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Router not initialized: call initialize() first")]
    NotInitialized,
}

/// An initialized provider session.
#[derive(Debug)]
pub struct RouterSession {
    kind: ProviderKind,
    model: String,
    config: ProviderConfig,
    oracle: ClassificationOracle,
}

impl RouterSession {
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Model used when a query does not name one.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Routes customer queries to an intent label.
#[derive(Debug)]
pub struct Router {
    registry: ProviderRegistry,
    config: RuntimeConfig,
    session: Option<RouterSession>,
}

impl Router {
    pub fn new(registry: ProviderRegistry, config: RuntimeConfig) -> Self {
        Self {
            registry,
            config,
            session: None,
        }
    }

    /// A router over the built-in transports and default settings.
    pub fn with_defaults() -> Self {
        Self::new(ProviderRegistry::with_defaults(), RuntimeConfig::default())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Effective settings for a provider named by the user.
    pub fn provider_config(&self, provider: &str) -> Result<ProviderConfig, RouterError> {
        let kind = provider
            .parse::<ProviderKind>()
            .map_err(|e| RouterError::Configuration(e.to_string()))?;
        Ok(self.config.provider(kind))
    }

    /// Start a session with `provider`, replacing any previous one.
    ///
    /// Returns the model the session will use: `model` when given, the
    /// provider's default otherwise. On failure no session remains and no
    /// remote call has been made.
    pub fn initialize(&mut self, provider: &str, model: Option<&str>) -> Result<String, RouterError> {
        self.session = None;

        let config = self.provider_config(provider)?;
        let transport = self
            .registry
            .create(&config)
            .map_err(|e| RouterError::Configuration(e.to_string()))?;

        let model = model
            .map(str::to_string)
            .unwrap_or_else(|| config.default_model.clone());

        let oracle = ClassificationOracle::new(config.kind, transport, model.clone())
            .with_timeout(self.config.request_timeout)
            .with_max_tokens(self.config.max_tokens);

        info!(provider = %config.kind, model = %model, "Router initialized");

        self.session = Some(RouterSession {
            kind: config.kind,
            model: model.clone(),
            config,
            oracle,
        });

        Ok(model)
    }

    pub fn session(&self) -> Option<&RouterSession> {
        self.session.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Model of the current session.
    pub fn current_model(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.model())
    }

    /// Classify a query.
    ///
    /// `model` overrides the session model for this query only.
    pub async fn classify(&self, query: &str, model: Option<&str>) -> Result<RouteOutcome, RouterError> {
        let session = self.session.as_ref().ok_or(RouterError::NotInitialized)?;

        match session.oracle.classify(SYSTEM_INSTRUCTION, query, model).await {
            Ok(text) => {
                let outcome = RouteOutcome::from_oracle_text(text);
                debug!(provider = %session.kind, outcome = %outcome, "Query routed");
                Ok(outcome)
            }
            Err(e) => {
                warn!(provider = %session.kind, error = %e, "Error during routing");
                Ok(RouteOutcome::Failed(e.to_string()))
            }
        }
    }
}
