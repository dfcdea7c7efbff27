//! The evaluation harness.
//!
//! Runs a labeled corpus through the [`Router`] one query at a time and
//! scores every answer. A batch never aborts: initialization failures
//! yield an all-errors result, and failures inside a single case are
//! recorded against that case only.
//!
//! # Execution Flow
//! 1. Initialize the router for the provider
//! 2. Pace requests when the provider's budget is below the threshold
//! 3. Time each classification and score it
//! 4. Aggregate latency and accuracy

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use intentroute_core::{
    EvaluationResult, PredictionDetail, ProviderConfig, ProviderKind, TestCase,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::resilience::RequestPacer;
use crate::router::{Router, RouterError};

/// Progress hooks for a running evaluation.
///
/// All methods default to doing nothing.
pub trait EvaluationObserver {
    /// A provider run is starting with its configured default model.
    fn on_start(&mut self, _provider: &str, _model: &str, _total: usize) {}

    /// The provider could not be initialized; no case will run.
    fn on_init_failed(&mut self, _provider: &str, _error: &RouterError) {}

    /// Requests will be spaced `delay` apart.
    fn on_pacing(&mut self, _config: &ProviderConfig, _delay: Duration) {}

    /// Case `index` (1-based) of `total` was scored.
    fn on_case(&mut self, _index: usize, _total: usize, _detail: &PredictionDetail) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EvaluationObserver for NoopObserver {}

/// Evaluates providers against a corpus using a borrowed router.
pub struct Evaluator<'r, O = NoopObserver> {
    router: &'r mut Router,
    observer: O,
}

impl<'r> Evaluator<'r, NoopObserver> {
    pub fn new(router: &'r mut Router) -> Self {
        Self {
            router,
            observer: NoopObserver,
        }
    }
}

impl<'r, O: EvaluationObserver> Evaluator<'r, O> {
    pub fn with_observer(router: &'r mut Router, observer: O) -> Self {
        Self { router, observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Evaluate one provider over `cases`, in order.
    pub async fn evaluate(&mut self, provider: &str, cases: &[TestCase]) -> EvaluationResult {
        let total = cases.len();
        let kind = provider.parse::<ProviderKind>().ok();
        let name = kind
            .map(|k| k.name().to_string())
            .unwrap_or_else(|| provider.trim().to_lowercase());
        let default_model = kind
            .map(|k| self.router.config().provider(k).default_model)
            .unwrap_or_default();

        self.observer.on_start(&name, &default_model, total);
        info!(provider = %name, model = %default_model, cases = total, "Evaluating provider");

        let model = match self.router.initialize(provider, None) {
            Ok(model) => model,
            Err(e) => {
                warn!(provider = %name, error = %e, "Failed to initialize provider");
                self.observer.on_init_failed(&name, &e);
                return EvaluationResult::initialization_failed(name, default_model, total);
            }
        };

        let mut pacer = match self.router.session() {
            Some(session) => {
                let pacer = RequestPacer::for_config(session.config());
                if let Some(delay) = pacer.delay() {
                    self.observer.on_pacing(session.config(), delay);
                }
                pacer
            }
            None => RequestPacer::new(None),
        };

        let mut result = EvaluationResult::new(name, model, total);

        for (i, case) in cases.iter().enumerate() {
            pacer.wait_turn().await;

            let start = Instant::now();
            let outcome = AssertUnwindSafe(self.router.classify(&case.query, None))
                .catch_unwind()
                .await;
            let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

            let detail = match outcome {
                Ok(Ok(outcome)) => PredictionDetail::scored(case, &outcome, latency_ms),
                Ok(Err(e)) => PredictionDetail::harness_error(case, e, latency_ms),
                Err(panic) => PredictionDetail::harness_error(case, panic_message(&*panic), latency_ms),
            };

            debug!(
                index = i + 1,
                total,
                predicted = %detail.predicted,
                correct = detail.correct,
                latency_ms = detail.latency_ms,
                "Case scored"
            );

            self.observer.on_case(i + 1, total, &detail);
            result.record(detail);
        }

        result.finalize();

        info!(
            provider = %result.provider,
            accuracy = result.accuracy,
            errors = result.errors,
            "Provider evaluated"
        );

        result
    }

    /// Evaluate several providers one after another, in the given order.
    pub async fn evaluate_all<S: AsRef<str>>(
        &mut self,
        providers: &[S],
        cases: &[TestCase],
    ) -> Vec<EvaluationResult> {
        let mut results = Vec::with_capacity(providers.len());
        for provider in providers {
            results.push(self.evaluate(provider.as_ref(), cases).await);
        }
        results
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("classification panicked: {}", message)
}
