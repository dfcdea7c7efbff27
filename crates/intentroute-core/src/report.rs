//! Reporter: ranks provider results, renders the console summary, and
//! persists the evaluation record.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write as _};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::EvaluationResult;

const RULE_WIDTH: usize = 80;

/// A metric with at least one decimal place: `100.0`, `96.67`.
fn metric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to serialize report: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Compact per-provider statistics for the report summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub provider: String,
    pub model: String,
    pub accuracy: f64,
    pub avg_latency_ms: f64,
    pub correct: usize,
    pub incorrect: usize,
    pub errors: usize,
}

impl From<&EvaluationResult> for ProviderSummary {
    fn from(r: &EvaluationResult) -> Self {
        Self {
            provider: r.provider.clone(),
            model: r.model.clone(),
            accuracy: r.accuracy,
            avg_latency_ms: r.avg_latency_ms,
            correct: r.correct,
            incorrect: r.incorrect,
            errors: r.errors,
        }
    }
}

/// The persisted evaluation artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub timestamp: DateTime<Local>,
    pub summary: Vec<ProviderSummary>,
    pub detailed_results: Vec<EvaluationResult>,
}

impl EvaluationRecord {
    /// Build a record in input order (not ranked).
    pub fn new(results: &[EvaluationResult], timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            summary: results.iter().map(ProviderSummary::from).collect(),
            detailed_results: results.to_vec(),
        }
    }

    /// Default file name derived from the record timestamp.
    pub fn default_filename(&self) -> String {
        format!(
            "evaluation_results_{}.json",
            self.timestamp.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Ranks and renders evaluation results.
pub struct Reporter;

impl Reporter {
    /// Results by accuracy, highest first. Ties keep input order.
    pub fn rank(results: &[EvaluationResult]) -> Vec<&EvaluationResult> {
        let mut ranked: Vec<&EvaluationResult> = results.iter().collect();
        ranked.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
        ranked
    }

    /// The top-ranked result.
    pub fn best(results: &[EvaluationResult]) -> Option<&EvaluationResult> {
        Self::rank(results).into_iter().next()
    }

    /// Fixed-width comparison table, ranked.
    pub fn render_table(results: &[EvaluationResult]) -> String {
        let mut out = String::new();
        let rule = "=".repeat(RULE_WIDTH);
        let thin = "-".repeat(RULE_WIDTH);

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "EVALUATION RESULTS SUMMARY");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<12} {:<28} {:<12} {:<15} {:<8}",
            "Provider", "Model", "Accuracy", "Avg Latency", "Errors"
        );
        let _ = writeln!(out, "{}", thin);

        for r in Self::rank(results) {
            let _ = writeln!(
                out,
                "{:<12} {:<28} {:>6.1}%     {:>8.0} ms     {:<8}",
                r.provider.to_uppercase(),
                r.model,
                r.accuracy,
                r.avg_latency_ms,
                r.errors
            );
        }

        let _ = write!(out, "{}", thin);
        out
    }

    /// Announcement of the top-ranked provider.
    pub fn render_best(results: &[EvaluationResult]) -> Option<String> {
        Self::best(results).map(|best| {
            format!(
                "BEST MODEL: {} ({})\n   Accuracy: {}% | Avg Latency: {} ms",
                best.provider.to_uppercase(),
                best.model,
                metric(best.accuracy),
                metric(best.avg_latency_ms)
            )
        })
    }

    /// Incorrect and failed predictions, per provider in input order.
    pub fn render_failures(results: &[EvaluationResult]) -> String {
        let mut out = String::new();
        let rule = "=".repeat(RULE_WIDTH);

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "INCORRECT PREDICTIONS (for analysis)");
        let _ = write!(out, "{}", rule);

        for r in results {
            let mut misses = r.incorrect_predictions().peekable();
            if misses.peek().is_none() {
                continue;
            }

            let _ = write!(out, "\n\n{}:", r.provider.to_uppercase());
            for d in misses {
                let _ = write!(out, "\n  Query: {}", d.query);
                let _ = write!(out, "\n  Expected: {} | Predicted: {}", d.expected, d.predicted);
                if let Some(error) = &d.error {
                    let _ = write!(out, "\n  Error: {}", error);
                }
                let _ = writeln!(out);
            }
        }

        out
    }

    /// Write the record as pretty JSON into `dir`, creating it if needed.
    ///
    /// Uses `filename` when given, otherwise a timestamp-derived name. An
    /// existing file is never overwritten: a numeric suffix is added instead.
    pub fn save(
        record: &EvaluationRecord,
        dir: impl AsRef<Path>,
        filename: Option<&str>,
    ) -> Result<PathBuf, ReportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| record.default_filename());
        let (file, path) = create_unique(dir, &filename)?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(path = %path.display(), "Saved evaluation results");
        Ok(path)
    }
}

/// Create `dir/filename`, or `dir/stem_N.ext` if it already exists.
fn create_unique(dir: &Path, filename: &str) -> io::Result<(fs::File, PathBuf)> {
    let base = Path::new(filename);
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("evaluation_results")
        .to_string();
    let extension = base.extension().and_then(|e| e.to_str()).map(str::to_string);

    let mut attempt = 0u32;
    loop {
        let name = match (attempt, &extension) {
            (0, _) => filename.to_string(),
            (n, Some(ext)) => format!("{}_{}.{}", stem, n, ext),
            (n, None) => format!("{}_{}", stem, n),
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}
