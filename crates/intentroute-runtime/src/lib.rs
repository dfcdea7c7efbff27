//! # intentroute-runtime
//!
//! Remote classification and the evaluation harness for intentroute.
//!
//! The deterministic pieces (labels, corpus, scoring, reporting) live in
//! `intentroute-core`. This crate adds everything that talks to a hosted
//! model:
//!
//! - [`providers`]: transports for Google Gemini and Groq behind one trait
//! - [`Router`]: one provider session, classifying queries into a
//!   [`RouteOutcome`](intentroute_core::RouteOutcome)
//! - [`Evaluator`]: runs a corpus through the router with rate-limit pacing
//!
//! ## Example
//!
//! ```rust,ignore
//! use intentroute_core::Corpus;
//! use intentroute_runtime::{Evaluator, Router};
//!
//! let mut router = Router::with_defaults();
//! let corpus = Corpus::builtin();
//!
//! let result = Evaluator::new(&mut router).evaluate("groq", corpus.cases()).await;
//! println!("{}: {}%", result.provider, result.accuracy);
//! ```

pub mod config;
pub mod evaluator;
pub mod oracle;
pub mod prompts;
pub mod providers;
pub mod resilience;
pub mod router;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, ProviderAvailability, ProviderOverrides, RuntimeConfig};
pub use evaluator::{EvaluationObserver, Evaluator, NoopObserver};
pub use oracle::ClassificationOracle;
pub use prompts::SYSTEM_INSTRUCTION;
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderFactory, ProviderRegistry, TokenUsage,
};
pub use resilience::RequestPacer;
pub use router::{Router, RouterError, RouterSession};
