//! intentroute - route customer queries with an LLM and compare providers.

mod commands;
mod console;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "intentroute",
    version,
    about = "LLM intent router for customer service queries",
    long_about = "Classify customer queries as FAQ or ORDER with a hosted model, chat with the routed bot, and compare providers on a labeled corpus.",
    after_help = "Examples:\n  intentroute evaluate\n  intentroute evaluate groq --output run.json\n  intentroute chat google\n  intentroute providers"
)]
struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "YAML settings file")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Evaluate providers on a labeled corpus and save a JSON report")]
    Evaluate {
        #[arg(value_name = "PROVIDER", help = "Providers to evaluate (default: all with a key)")]
        providers: Vec<String>,

        #[arg(long, value_name = "PATH", help = "Corpus file (.yaml, .yml or .json)")]
        corpus: Option<PathBuf>,

        #[arg(long, value_name = "DIR", help = "Directory for the results file")]
        output_dir: Option<PathBuf>,

        #[arg(long, value_name = "FILE", help = "Results file name")]
        output: Option<String>,
    },

    #[command(about = "Chat with the routed customer service bot")]
    Chat {
        #[arg(value_name = "PROVIDER", help = "google or groq")]
        provider: String,

        #[arg(long, help = "Model to use instead of the provider default")]
        model: Option<String>,
    },

    #[command(about = "List providers and whether their API key is set")]
    Providers,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match commands::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Evaluate {
            providers,
            corpus,
            output_dir,
            output,
        } => {
            let options = commands::evaluate::EvaluateOptions {
                providers,
                corpus,
                output_dir,
                output,
            };
            commands::evaluate::run(config, options).await
        }
        Command::Chat { provider, model } => {
            commands::chat::run(config, &provider, model.as_deref()).await
        }
        Command::Providers => commands::providers::run(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so the report on stdout stays clean.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
