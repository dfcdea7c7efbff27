//! Scoring: turns routing outcomes into per-provider metrics.
//!
//! Scoring rules are fixed:
//! 1. A prediction is correct when its text equals the expected label exactly
//! 2. Failed calls and harness failures count as errors, never as incorrect
//! 3. Text that is not a known label is incorrect and also counted as unrecognized
//! 4. Accuracy is `correct / total * 100` rounded to 2 decimals, 0.0 when empty

use std::fmt::Display;

use crate::types::{
    EvaluationResult, Label, OutcomeKind, PredictionDetail, RouteOutcome, TestCase,
};

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Accuracy percentage for a tally.
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(correct as f64 / total as f64 * 100.0)
    }
}

impl PredictionDetail {
    /// Score a routing outcome against its test case.
    pub fn scored(case: &TestCase, outcome: &RouteOutcome, latency_ms: f64) -> Self {
        let predicted = outcome.predicted().to_string();
        let correct = !outcome.is_failed() && predicted == case.expected.as_str();
        let error = match outcome {
            RouteOutcome::Failed(reason) => Some(reason.clone()),
            _ => None,
        };

        Self {
            query: case.query.clone(),
            expected: case.expected,
            predicted,
            correct,
            latency_ms: round2(latency_ms),
            outcome: outcome.kind(),
            error,
            measured_ms: Some(latency_ms),
        }
    }

    /// Record a failure raised by the evaluation harness itself.
    pub fn harness_error(case: &TestCase, error: impl Display, latency_ms: f64) -> Self {
        Self {
            query: case.query.clone(),
            expected: case.expected,
            predicted: Label::Error.as_str().to_string(),
            correct: false,
            latency_ms: round2(latency_ms),
            outcome: OutcomeKind::Failed,
            error: Some(error.to_string()),
            measured_ms: None,
        }
    }
}

impl EvaluationResult {
    /// An empty result expecting `total` cases.
    pub fn new(provider: impl Into<String>, model: impl Into<String>, total: usize) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            total,
            correct: 0,
            incorrect: 0,
            errors: 0,
            unrecognized: 0,
            accuracy: 0.0,
            avg_latency_ms: 0.0,
            total_latency_ms: 0.0,
            details: Vec::new(),
        }
    }

    /// Result for a provider that could not be initialized.
    ///
    /// Every case counts as an error and no details are recorded.
    pub fn initialization_failed(
        provider: impl Into<String>,
        model: impl Into<String>,
        total: usize,
    ) -> Self {
        let mut result = Self::new(provider, model, total);
        result.errors = total;
        result
    }

    /// Append a detail and update the tallies.
    pub fn record(&mut self, detail: PredictionDetail) {
        match detail.outcome {
            OutcomeKind::Failed => self.errors += 1,
            _ if detail.correct => self.correct += 1,
            OutcomeKind::Unrecognized => {
                self.incorrect += 1;
                self.unrecognized += 1;
            }
            OutcomeKind::Routed => self.incorrect += 1,
        }
        self.details.push(detail);
    }

    /// Compute latency aggregates and accuracy from the recorded details.
    ///
    /// Harness failures carry no measurement and are left out of the
    /// latency aggregates. Only the aggregates are rounded.
    pub fn finalize(&mut self) {
        let measured: Vec<f64> = self.details.iter().filter_map(|d| d.measured_ms).collect();
        if measured.is_empty() {
            self.avg_latency_ms = 0.0;
            self.total_latency_ms = 0.0;
        } else {
            let total_latency: f64 = measured.iter().sum();
            self.avg_latency_ms = round2(total_latency / measured.len() as f64);
            self.total_latency_ms = round2(total_latency);
        }
        self.accuracy = accuracy(self.correct, self.total);
    }

    /// Whether the tallies add up to the total.
    pub fn is_consistent(&self) -> bool {
        self.correct + self.incorrect + self.errors == self.total
    }

    /// Details that were not scored correct, in evaluation order.
    pub fn incorrect_predictions(&self) -> impl Iterator<Item = &PredictionDetail> {
        self.details.iter().filter(|d| !d.correct)
    }
}
