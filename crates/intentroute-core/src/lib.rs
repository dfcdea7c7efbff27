//! # intentroute-core
//!
//! Deterministic building blocks for LLM intent routing and its evaluation.
//!
//! This crate answers, without any network access:
//! - Which labels exist and how oracle text maps onto them
//! - Which queries the router is measured against
//! - How predictions are scored and how providers are ranked
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same predictions always produce the same scores
//! 2. **No LLM calls**: Remote classification lives in `intentroute-runtime`
//! 3. **Consistent tallies**: `correct + incorrect + errors == total`
//!
//! ## Example
//!
//! ```rust
//! use intentroute_core::{Corpus, EvaluationResult, Label, PredictionDetail, RouteOutcome};
//!
//! let corpus = Corpus::builtin();
//! let mut result = EvaluationResult::new("groq", "llama-3.1-8b-instant", 1);
//! let case = &corpus.cases()[0];
//! result.record(PredictionDetail::scored(case, &RouteOutcome::Routed(Label::Faq), 120.0));
//! result.finalize();
//!
//! assert_eq!(result.correct, 1);
//! assert!(result.is_consistent());
//! ```

pub mod corpus;
pub mod handlers;
pub mod provider;
pub mod report;
pub mod scoring;
pub mod types;

// Re-export main types at crate root
pub use corpus::{Corpus, CorpusError};
pub use handlers::{Dispatcher, FaqHandler, IntentHandler, OrderHandler, UNROUTABLE_RESPONSE};
pub use provider::{
    inter_request_delay, ProviderConfig, ProviderKind, RequestShape, UnknownProvider,
    DEFAULT_REQUESTS_PER_MINUTE, LOW_THROUGHPUT_THRESHOLD,
};
pub use report::{EvaluationRecord, ProviderSummary, ReportError, Reporter};
pub use scoring::{accuracy, round2};
pub use types::{
    EvaluationResult, Label, OutcomeKind, PredictionDetail, RouteOutcome, TestCase,
};
