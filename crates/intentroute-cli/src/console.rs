//! Console progress for evaluation runs.

use std::io::Write;
use std::time::Duration;

use intentroute_core::{OutcomeKind, PredictionDetail, ProviderConfig};
use intentroute_runtime::{EvaluationObserver, RouterError};

pub const RULE_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 40;

/// First `max` characters of `text`.
pub fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Prints one line per event, the way the evaluation report reads.
pub struct ConsoleObserver<W: Write> {
    out: W,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EvaluationObserver for ConsoleObserver<W> {
    fn on_start(&mut self, provider: &str, model: &str, _total: usize) {
        let rule = "-".repeat(SECTION_WIDTH);
        let _ = writeln!(self.out, "\n{}", rule);
        let _ = writeln!(self.out, "Evaluating: {} ({})", provider.to_uppercase(), model);
        let _ = writeln!(self.out, "{}", rule);
    }

    fn on_init_failed(&mut self, provider: &str, error: &RouterError) {
        let _ = writeln!(self.out, "  [ERROR] Failed to initialize {}: {}", provider, error);
    }

    fn on_pacing(&mut self, config: &ProviderConfig, delay: Duration) {
        let _ = writeln!(
            self.out,
            "  [NOTE] Rate limit is {}/min - adding {:.1}s delay between requests",
            config.requests_per_minute,
            delay.as_secs_f64()
        );
    }

    fn on_case(&mut self, index: usize, total: usize, detail: &PredictionDetail) {
        let _ = match detail.outcome {
            OutcomeKind::Failed => writeln!(
                self.out,
                "  [{}/{}] ERROR: {}...",
                index,
                total,
                preview(&detail.query, 40)
            ),
            _ => writeln!(
                self.out,
                "  [{}/{}] {} {}...",
                index,
                total,
                if detail.correct { "OK" } else { "FAIL" },
                preview(&detail.query, 50)
            ),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentroute_core::{Label, ProviderKind, RouteOutcome, TestCase};

    fn render(events: impl FnOnce(&mut ConsoleObserver<Vec<u8>>)) -> String {
        let mut observer = ConsoleObserver::new(Vec::new());
        events(&mut observer);
        String::from_utf8(observer.into_inner()).unwrap()
    }

    #[test]
    fn preview_counts_characters() {
        assert_eq!(preview("héllo wörld", 5), "héllo");
        assert_eq!(preview("short", 50), "short");
    }

    #[test]
    fn case_lines() {
        let case = TestCase::new("Where is my order 101?", Label::Order);
        let ok = PredictionDetail::scored(&case, &RouteOutcome::Routed(Label::Order), 10.0);
        let fail = PredictionDetail::scored(&case, &RouteOutcome::Routed(Label::Faq), 10.0);
        let error = PredictionDetail::scored(&case, &RouteOutcome::Failed("timeout".into()), 10.0);

        let out = render(|o| {
            o.on_case(1, 3, &ok);
            o.on_case(2, 3, &fail);
            o.on_case(3, 3, &error);
        });

        assert_eq!(
            out,
            "  [1/3] OK Where is my order 101?...\n  [2/3] FAIL Where is my order 101?...\n  [3/3] ERROR: Where is my order 101?...\n"
        );
    }

    #[test]
    fn pacing_note() {
        let config = ProviderKind::Google.config();
        let out = render(|o| o.on_pacing(&config, config.inter_request_delay()));
        assert_eq!(
            out,
            "  [NOTE] Rate limit is 5/min - adding 12.5s delay between requests\n"
        );
    }

    #[test]
    fn start_banner() {
        let out = render(|o| o.on_start("groq", "llama-3.1-8b-instant", 30));
        assert!(out.contains("Evaluating: GROQ (llama-3.1-8b-instant)"));
        assert!(out.starts_with('\n'));
    }

    #[test]
    fn init_failure_line() {
        let out = render(|o| o.on_init_failed("google", &RouterError::NotInitialized));
        assert!(out.starts_with("  [ERROR] Failed to initialize google:"));
    }
}
