//! Static catalog of supported classification providers.
//!
//! The set of providers is closed. Each kind carries its request shape, so
//! adding a provider means adding a variant and handling it everywhere the
//! compiler asks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Providers below this many requests per minute are paced.
pub const LOW_THROUGHPUT_THRESHOLD: u32 = 10;

/// Extra wait added on top of the per-request share of a minute.
pub const PACING_BUFFER: Duration = Duration::from_millis(500);

/// Rate assumed for a provider without a configured budget.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown provider: '{0}'. Use 'google' or 'groq'")]
pub struct UnknownProvider(pub String);

/// How a provider family expects the instruction and query to be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// Separate system and user messages, temperature 0
    ChatCompletion,

    /// One prompt with the instruction concatenated ahead of the query
    SinglePrompt,
}

/// A supported provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    Google,

    /// Groq (OpenAI-compatible)
    Groq,
}

impl ProviderKind {
    /// Every provider, in catalog order.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Google, ProviderKind::Groq];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::Groq => "groq",
        }
    }

    pub fn request_shape(&self) -> RequestShape {
        match self {
            ProviderKind::Google => RequestShape::SinglePrompt,
            ProviderKind::Groq => RequestShape::ChatCompletion,
        }
    }

    /// Built-in configuration for this provider.
    pub fn config(&self) -> ProviderConfig {
        match self {
            ProviderKind::Google => ProviderConfig {
                kind: *self,
                api_key_env: "GOOGLE_API_KEY".to_string(),
                default_model: "gemini-2.5-flash".to_string(),
                requests_per_minute: 5,
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            },
            ProviderKind::Groq => ProviderConfig {
                kind: *self,
                api_key_env: "GROQ_API_KEY".to_string(),
                default_model: "llama-3.1-8b-instant".to_string(),
                requests_per_minute: 30,
                base_url: "https://api.groq.com/openai/v1".to_string(),
            },
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    /// Case-insensitive lookup by provider name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Static settings for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Model used when the caller does not name one
    pub default_model: String,

    /// Request budget per minute
    pub requests_per_minute: u32,

    /// API root for the provider
    pub base_url: String,
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// `60 / requests_per_minute` seconds plus the pacing buffer.
    pub fn inter_request_delay(&self) -> Duration {
        inter_request_delay(self.requests_per_minute)
    }

    /// Whether consecutive requests must be spaced out.
    pub fn needs_pacing(&self) -> bool {
        self.requests_per_minute < LOW_THROUGHPUT_THRESHOLD
    }

    /// The delay to apply between requests, if any.
    pub fn pacing_delay(&self) -> Option<Duration> {
        self.needs_pacing().then(|| self.inter_request_delay())
    }
}

/// Delay between requests for a given budget.
///
/// A zero budget is treated as one request per minute.
pub fn inter_request_delay(requests_per_minute: u32) -> Duration {
    let rpm = requests_per_minute.max(1);
    Duration::from_secs_f64(60.0 / f64::from(rpm)) + PACING_BUFFER
}
