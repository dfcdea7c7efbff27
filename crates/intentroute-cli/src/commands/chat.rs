//! `intentroute chat`: interactive routed customer service bot.

use std::io::{self, Write};
use std::process::ExitCode;

use intentroute_core::{Dispatcher, ProviderKind};
use intentroute_runtime::{ApiCredential, ProviderRegistry, Router, RuntimeConfig};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

fn print_usage() {
    println!("Usage: intentroute chat <PROVIDER>");
    println!("  Providers: google, groq");
    println!("\nExamples:");
    println!("  intentroute chat google  # Google Gemini 2.5 Flash");
    println!("  intentroute chat groq    # Groq Llama 3.1 8B");
}

pub async fn run(
    config: RuntimeConfig,
    provider: &str,
    model: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let kind = match provider.parse::<ProviderKind>() {
        Ok(kind) => kind,
        Err(_) => {
            println!("Error: Unknown provider '{}'.\n", provider);
            print_usage();
            return Ok(ExitCode::FAILURE);
        }
    };

    let api_key_env = config.provider(kind).api_key_env;
    if !ApiCredential::is_available(&api_key_env) {
        println!("Error: {} not found in environment.", api_key_env);
        return Ok(ExitCode::FAILURE);
    }

    let mut router = Router::new(ProviderRegistry::with_defaults(), config);
    let model = match router.initialize(kind.name(), model) {
        Ok(model) => model,
        Err(e) => {
            println!("Error initializing client: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "[INFO] Using {} as AI provider (model: {})\n",
        kind.name().to_uppercase(),
        model
    );

    let input = BufReader::new(tokio::io::stdin());
    chat_loop(&router, &Dispatcher::default(), input, io::stdout()).await?;
    Ok(ExitCode::SUCCESS)
}

/// Read queries until `exit`, `quit` or end of input, answering each one.
pub async fn chat_loop<R, W>(
    router: &Router,
    dispatcher: &Dispatcher,
    input: R,
    mut out: W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "--- Customer Service Bot Initialized ---")?;
    writeln!(out, "Type 'exit' or 'quit' to quit.\n")?;

    let mut lines = input.lines();
    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }

        let outcome = router.classify(query, None).await?;
        writeln!(out, "[DEBUG] Router identified intent: {}", outcome)?;
        writeln!(out, "Bot: {}\n", dispatcher.respond(&outcome, query))?;
    }

    Ok(())
}
