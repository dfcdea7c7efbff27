//! Corpus loading from YAML/JSON.

use std::fs;
use std::path::Path;
use thiserror::Error;

use super::builtin::BUILTIN_CASES;
use super::schema::validate_corpus_schema;
use crate::types::{Label, TestCase};

/// Errors that can occur when loading a corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read corpus file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Corpus does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Unsupported corpus format: '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
}

/// An ordered, read-only set of labeled queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    cases: Vec<TestCase>,
}

impl Corpus {
    /// Create a corpus from already-validated cases.
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// The built-in 30-case customer-service corpus.
    pub fn builtin() -> Self {
        let cases = BUILTIN_CASES
            .iter()
            .map(|(query, expected)| TestCase::new(*query, *expected))
            .collect();
        Self { cases }
    }

    /// Parse a corpus from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CorpusError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a corpus from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load a corpus file, choosing the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml(&fs::read_to_string(path)?),
            "json" => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(CorpusError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, CorpusError> {
        validate_corpus_schema(&value).map_err(CorpusError::SchemaError)?;
        let cases: Vec<TestCase> = serde_json::from_value(value)?;
        tracing::debug!(cases = cases.len(), "Loaded corpus");
        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Cases expecting the FAQ intent.
    pub fn faq_cases(&self) -> Vec<&TestCase> {
        self.with_expected(Label::Faq)
    }

    /// Cases expecting the ORDER intent.
    pub fn order_cases(&self) -> Vec<&TestCase> {
        self.with_expected(Label::Order)
    }

    fn with_expected(&self, label: Label) -> Vec<&TestCase> {
        self.cases.iter().filter(|c| c.expected == label).collect()
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
