//! `intentroute evaluate`: compare providers on a labeled corpus.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use intentroute_core::{Corpus, EvaluationRecord, ProviderKind, Reporter};
use intentroute_runtime::{
    Evaluator, ProviderAvailability, ProviderRegistry, Router, RuntimeConfig,
};
use tracing::debug;

use crate::console::{ConsoleObserver, RULE_WIDTH};

#[derive(Debug, Default)]
pub struct EvaluateOptions {
    pub providers: Vec<String>,
    pub corpus: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub output: Option<String>,
}

/// Providers to run: every provider with a key, or the requested ones
/// that have a key, in the order they were requested.
pub fn select_providers(available: &[ProviderKind], requested: &[String]) -> Vec<ProviderKind> {
    if requested.is_empty() {
        return available.to_vec();
    }

    requested
        .iter()
        .filter_map(|name| name.parse::<ProviderKind>().ok())
        .filter(|kind| available.contains(kind))
        .collect()
}

/// Error line naming every credential variable that could be set.
pub fn missing_keys_message(statuses: &[ProviderAvailability]) -> String {
    let vars: Vec<&str> = statuses.iter().map(|s| s.api_key_env.as_str()).collect();
    format!("[ERROR] No API keys found. Set {}.", vars.join(" or "))
}

pub async fn run(config: RuntimeConfig, options: EvaluateOptions) -> anyhow::Result<ExitCode> {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{}", rule);
    println!("LLM ROUTER EVALUATION");
    println!("{}", rule);

    let statuses = config.availability();
    for status in &statuses {
        let name = status.kind.name().to_uppercase();
        if status.available {
            println!("[OK] {} - API key found", name);
        } else {
            println!("[--] {} - API key not found ({})", name, status.api_key_env);
        }
    }

    let available = config.available_providers();
    if available.is_empty() {
        println!("\n{}", missing_keys_message(&statuses));
        return Ok(ExitCode::FAILURE);
    }

    let selected = select_providers(&available, &options.providers);
    if selected.is_empty() {
        println!("\n[ERROR] None of the requested providers are available.");
        return Ok(ExitCode::FAILURE);
    }

    let corpus = match &options.corpus {
        Some(path) => Corpus::from_file(path)
            .with_context(|| format!("Failed to load corpus from {}", path.display()))?,
        None => Corpus::builtin(),
    };

    let names: Vec<String> = selected.iter().map(|k| k.name().to_uppercase()).collect();
    println!("\nEvaluating providers: {}", names.join(", "));
    println!("Test cases: {}", corpus.len());

    let results_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| config.results_dir.clone());
    debug!(results_dir = %results_dir.display(), cases = corpus.len(), "Starting evaluation");

    let mut router = Router::new(ProviderRegistry::with_defaults(), config);
    let providers: Vec<&str> = selected.iter().map(|k| k.name()).collect();
    let results = Evaluator::with_observer(&mut router, ConsoleObserver::new(io::stdout()))
        .evaluate_all(&providers, corpus.cases())
        .await;

    println!("\n{}", Reporter::render_table(&results));
    if let Some(best) = Reporter::render_best(&results) {
        println!("\n{}", best);
    }

    let record = EvaluationRecord::new(&results, Local::now());
    let saved = Reporter::save(&record, &results_dir, options.output.as_deref());
    match &saved {
        Ok(path) => println!("\nDetailed results saved to: {}", path.display()),
        Err(e) => eprintln!("\nError: failed to save results to {}: {}", results_dir.display(), e),
    }

    println!("\n{}", Reporter::render_failures(&results));

    Ok(if saved.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use intentroute_runtime::ProviderOverrides;

    fn config_with_keys(google: &str, groq: &str) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        for (kind, env) in [(ProviderKind::Google, google), (ProviderKind::Groq, groq)] {
            config.providers.insert(
                kind,
                ProviderOverrides {
                    api_key_env: Some(env.to_string()),
                    ..Default::default()
                },
            );
        }
        config
    }

    #[test]
    fn missing_keys_names_configured_variables() {
        let config = config_with_keys("MY_GEMINI_KEY", "MY_GROQ_KEY");
        assert_eq!(
            missing_keys_message(&config.availability()),
            "[ERROR] No API keys found. Set MY_GEMINI_KEY or MY_GROQ_KEY."
        );
    }

    #[tokio::test]
    async fn no_credentials_exits_with_failure() {
        let config = config_with_keys(
            "INTENTROUTE_TEST_EVALUATE_NONE_GOOGLE",
            "INTENTROUTE_TEST_EVALUATE_NONE_GROQ",
        );
        let code = run(config, EvaluateOptions::default()).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn unavailable_request_exits_with_failure() {
        std::env::set_var("INTENTROUTE_TEST_EVALUATE_SOME_GROQ", "gsk-1");
        let config = config_with_keys(
            "INTENTROUTE_TEST_EVALUATE_SOME_GOOGLE",
            "INTENTROUTE_TEST_EVALUATE_SOME_GROQ",
        );
        let options = EvaluateOptions {
            providers: vec!["google".to_string()],
            ..Default::default()
        };
        let code = run(config, options).await.unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn all_available_when_nothing_requested() {
        let available = [ProviderKind::Google, ProviderKind::Groq];
        assert_eq!(select_providers(&available, &[]), available.to_vec());
    }

    #[test]
    fn requested_order_is_kept() {
        let available = [ProviderKind::Google, ProviderKind::Groq];
        let requested = vec!["GROQ".to_string(), "google".to_string()];
        assert_eq!(
            select_providers(&available, &requested),
            vec![ProviderKind::Groq, ProviderKind::Google]
        );
    }

    #[test]
    fn unavailable_and_unknown_are_dropped() {
        let available = [ProviderKind::Groq];
        let requested = vec!["google".to_string(), "bogus".to_string()];
        assert!(select_providers(&available, &requested).is_empty());
    }
}
