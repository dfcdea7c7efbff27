//! Shared types for routing and evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalized classification label.
///
/// `Error` is a sentinel for a failed classification. It is never a valid
/// expected value in a test corpus, only a possible prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "FAQ")]
    Faq,
    #[serde(rename = "ORDER")]
    Order,
    #[serde(rename = "ERROR")]
    Error,
}

impl Label {
    /// The wire form of the label (`FAQ`, `ORDER`, `ERROR`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Faq => "FAQ",
            Label::Order => "ORDER",
            Label::Error => "ERROR",
        }
    }

    /// Map normalized oracle text onto a routable label.
    ///
    /// Only `FAQ` and `ORDER` are routable. Matching is exact: the caller is
    /// expected to have trimmed and uppercased the text already.
    pub fn routable(text: &str) -> Option<Label> {
        match text {
            "FAQ" => Some(Label::Faq),
            "ORDER" => Some(Label::Order),
            _ => None,
        }
    }

    /// Whether this label may appear as an expected value.
    pub fn is_routable(&self) -> bool {
        !matches!(self, Label::Error)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FAQ" => Ok(Label::Faq),
            "ORDER" => Ok(Label::Order),
            "ERROR" => Ok(Label::Error),
            other => Err(format!("unknown label: '{}'", other)),
        }
    }
}

/// A labeled query from the evaluation corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// The customer query text
    pub query: String,

    /// The intent the router should produce
    pub expected: Label,
}

impl TestCase {
    pub fn new(query: impl Into<String>, expected: Label) -> Self {
        Self {
            query: query.into(),
            expected,
        }
    }
}

/// Outcome of routing a single query.
///
/// The oracle is trusted to answer with a bare label, but nothing forces it
/// to. Text that is not a known label is kept verbatim as `Unrecognized` so
/// it can be told apart from a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The oracle answered with a known label
    Routed(Label),

    /// The oracle answered, but not with `FAQ` or `ORDER` (may be empty)
    Unrecognized(String),

    /// The oracle could not be reached or rejected the request
    Failed(String),
}

impl RouteOutcome {
    /// Build an outcome from normalized oracle text.
    pub fn from_oracle_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match Label::routable(&text) {
            Some(label) => RouteOutcome::Routed(label),
            None => RouteOutcome::Unrecognized(text),
        }
    }

    /// The predicted label text as it is scored and reported.
    ///
    /// Failed calls report the `ERROR` sentinel.
    pub fn predicted(&self) -> &str {
        match self {
            RouteOutcome::Routed(label) => label.as_str(),
            RouteOutcome::Unrecognized(text) => text,
            RouteOutcome::Failed(_) => Label::Error.as_str(),
        }
    }

    /// The routable label, if any.
    pub fn label(&self) -> Option<Label> {
        match self {
            RouteOutcome::Routed(label) => Some(*label),
            _ => None,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            RouteOutcome::Routed(_) => OutcomeKind::Routed,
            RouteOutcome::Unrecognized(_) => OutcomeKind::Unrecognized,
            RouteOutcome::Failed(_) => OutcomeKind::Failed,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RouteOutcome::Failed(_))
    }
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.predicted())
    }
}

/// Serialized classification of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Routed,
    Unrecognized,
    Failed,
}

/// Per-case record produced by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetail {
    pub query: String,
    pub expected: Label,
    pub predicted: String,
    pub correct: bool,
    pub latency_ms: f64,
    pub outcome: OutcomeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Unrounded latency; `None` when the harness itself failed.
    #[serde(skip)]
    pub(crate) measured_ms: Option<f64>,
}

/// Aggregated metrics for one provider run.
///
/// Invariant: `correct + incorrect + errors == total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub provider: String,
    pub model: String,
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub errors: usize,

    /// Incorrect predictions whose text was not a known label
    #[serde(default)]
    pub unrecognized: usize,

    /// Percentage of correct predictions, 2 decimal places
    pub accuracy: f64,

    /// Aggregates over the cases whose latency was measured
    pub avg_latency_ms: f64,
    pub total_latency_ms: f64,
    pub details: Vec<PredictionDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_wire_format() {
        assert_eq!(serde_json::to_string(&Label::Faq).unwrap(), "\"FAQ\"");
        assert_eq!(serde_json::to_string(&Label::Order).unwrap(), "\"ORDER\"");
        let parsed: Label = serde_json::from_str("\"ERROR\"").unwrap();
        assert_eq!(parsed, Label::Error);
    }

    #[test]
    fn test_label_from_str_is_lenient() {
        assert_eq!(" faq ".parse::<Label>().unwrap(), Label::Faq);
        assert!("shipping".parse::<Label>().is_err());
    }

    #[test]
    fn test_routable_is_exact() {
        assert_eq!(Label::routable("ORDER"), Some(Label::Order));
        assert_eq!(Label::routable("ORDER."), None);
        assert_eq!(Label::routable("ERROR"), None);
        assert!(!Label::Error.is_routable());
    }

    #[test]
    fn test_outcome_from_oracle_text() {
        assert_eq!(
            RouteOutcome::from_oracle_text("FAQ"),
            RouteOutcome::Routed(Label::Faq)
        );

        let odd = RouteOutcome::from_oracle_text("FAQ_INTENT");
        assert_eq!(odd.kind(), OutcomeKind::Unrecognized);
        assert_eq!(odd.predicted(), "FAQ_INTENT");
        assert_eq!(odd.label(), None);

        let empty = RouteOutcome::from_oracle_text("");
        assert_eq!(empty.predicted(), "");
    }

    #[test]
    fn test_failed_outcome_reports_error_sentinel() {
        let outcome = RouteOutcome::Failed("connection refused".to_string());
        assert_eq!(outcome.predicted(), "ERROR");
        assert!(outcome.is_failed());
        assert_eq!(outcome.to_string(), "ERROR");
    }

    #[test]
    fn test_detail_omits_missing_error() {
        let detail = PredictionDetail {
            query: "When do you open?".to_string(),
            expected: Label::Faq,
            predicted: "FAQ".to_string(),
            correct: true,
            latency_ms: 12.5,
            outcome: OutcomeKind::Routed,
            error: None,
            measured_ms: Some(12.5),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["outcome"], "routed");
        assert_eq!(json["expected"], "FAQ");
    }
}
