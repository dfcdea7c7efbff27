//! Provider factories and the registry that maps provider kinds to them.
//!
//! A factory turns a [`ProviderConfig`] plus a loaded credential into a
//! live transport. The registry owns the credential lookup so that a
//! missing key is reported before any factory runs.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.create(&ProviderKind::Groq.config())?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use intentroute_core::{ProviderConfig, ProviderKind};

use super::secrets::ApiCredential;
use super::{LlmProvider, ProviderError};

/// Factory for creating LLM providers from configuration.
pub trait ProviderFactory: Send + Sync {
    /// The provider kind this factory builds.
    fn kind(&self) -> ProviderKind;

    /// Create a provider instance.
    ///
    /// The credential has already been loaded and is non-empty.
    fn create(
        &self,
        config: &ProviderConfig,
        credential: ApiCredential,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    /// Human-readable description of this provider.
    fn description(&self) -> &'static str {
        "LLM Provider"
    }
}

/// Label used for a provider's credential in errors and logs.
pub fn credential_label(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Google => "Google API key",
        ProviderKind::Groq => "Groq API key",
    }
}

/// Registry of available provider factories.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<ProviderKind, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider factory.
    ///
    /// If a factory for the same kind already exists, it will be replaced.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories.insert(factory.kind(), factory);
    }

    /// Load the credential named by `config` and build the provider.
    ///
    /// Fails with [`ProviderError::NotConfigured`] when no factory is
    /// registered for the kind or the credential is absent. The factory is
    /// not invoked in either case.
    pub fn create(&self, config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let factory = self.factories.get(&config.kind).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "No transport registered for provider '{}'. Available: {:?}",
                config.kind,
                self.available_kinds()
            ))
        })?;

        let credential = ApiCredential::from_env(&config.api_key_env, credential_label(config.kind))?;
        factory.create(config, credential)
    }

    /// List registered provider kinds.
    pub fn available_kinds(&self) -> Vec<ProviderKind> {
        self.factories.keys().copied().collect()
    }

    /// Get the factory for a provider kind.
    pub fn get_factory(&self, kind: ProviderKind) -> Option<&Arc<dyn ProviderFactory>> {
        self.factories.get(&kind)
    }

    /// Create a registry with all built-in providers registered.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "google")]
        registry.register(Arc::new(super::GoogleProviderFactory));

        #[cfg(feature = "groq")]
        registry.register(Arc::new(super::GroqProviderFactory));

        registry
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_kinds())
            .finish()
    }
}
