//! `intentroute providers`: list the provider catalog and key status.

use std::fmt::Write as _;
use std::process::ExitCode;

use intentroute_runtime::{ProviderRegistry, RuntimeConfig};

pub fn render(config: &RuntimeConfig, registry: &ProviderRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<28} {:<10} {:<8} {:<40} Transport",
        "Provider", "Default model", "Rate", "Paced", "API key"
    );

    for status in config.availability() {
        let provider = config.provider(status.kind);
        let key = if status.available {
            format!("[OK] {}", status.api_key_env)
        } else {
            format!("[--] {} not set", status.api_key_env)
        };
        let transport = registry
            .get_factory(status.kind)
            .map_or("not built", |factory| factory.description());

        let _ = writeln!(
            out,
            "{:<10} {:<28} {:<10} {:<8} {:<40} {}",
            status.kind.name().to_uppercase(),
            provider.default_model,
            format!("{}/min", provider.requests_per_minute),
            if provider.needs_pacing() { "yes" } else { "no" },
            key,
            transport
        );
    }

    out
}

pub fn run(config: &RuntimeConfig) -> anyhow::Result<ExitCode> {
    print!("{}", render(config, &ProviderRegistry::with_defaults()));
    Ok(ExitCode::SUCCESS)
}
