//! Secure credential handling for LLM providers.
//!
//! Provider API keys are read from the environment at initialization time and
//! kept in a [`SecretString`] from then on:
//!
//! - **No accidental logging**: credentials never appear in Debug/Display output
//! - **Memory safety**: credentials are zeroed on drop
//! - **Explicit exposure**: the raw value is only reachable through `.expose()`
//!
//! ## Usage
//!
//! ```ignore
//! let cred = ApiCredential::from_env("GROQ_API_KEY", "Groq API key")?;
//! request.bearer_auth(cred.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a credential value. It cannot be logged after this point.
    pub fn new(value: impl Into<String>, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            name,
        }
    }

    /// Load a credential from an environment variable.
    ///
    /// A variable that is unset or blank counts as absent.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        match std::env::var(env_var) {
            Ok(value) if !value.trim().is_empty() => {
                Ok(Self::new(value, name))
            }
            _ => Err(ProviderError::NotConfigured(format!(
                "{} not found: set the '{}' environment variable",
                name, env_var
            ))),
        }
    }

    /// Check if a credential is available (without loading it).
    pub fn is_available(env_var: &str) -> bool {
        std::env::var(env_var)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }

    /// Expose the credential value for use in API calls.
    ///
    /// Only call this where the credential is actually needed (e.g., setting
    /// an HTTP header). Never store the exposed value.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [REDACTED]", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_redacted_in_debug() {
        let secret = "gsk-super-secret-key-12345";
        let cred = ApiCredential::new(secret, "Groq API key");

        let debug = format!("{:?}", cred);
        assert!(!debug.contains(secret), "Secret exposed in Debug!");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credential_redacted_in_display() {
        let secret = "AIza-super-secret-key-12345";
        let cred = ApiCredential::new(secret, "Google API key");

        let display = format!("{}", cred);
        assert!(!display.contains(secret), "Secret exposed in Display!");
        assert!(display.contains("Google API key"));
    }

    #[test]
    fn test_credential_expose() {
        let cred = ApiCredential::new("key-1", "Test key");
        assert_eq!(cred.expose(), "key-1");
        assert!(!cred.is_empty());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("INTENTROUTE_TEST_SECRETS_PRESENT", "env-key");
        let cred =
            ApiCredential::from_env("INTENTROUTE_TEST_SECRETS_PRESENT", "Test key").unwrap();
        assert_eq!(cred.expose(), "env-key");
        assert!(format!("{:?}", cred).contains("Test key"));
        assert!(ApiCredential::is_available("INTENTROUTE_TEST_SECRETS_PRESENT"));
        std::env::remove_var("INTENTROUTE_TEST_SECRETS_PRESENT");
    }

    #[test]
    fn test_from_env_missing() {
        let err = ApiCredential::from_env("INTENTROUTE_TEST_SECRETS_MISSING", "Test key")
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(err.to_string().contains("INTENTROUTE_TEST_SECRETS_MISSING"));
        assert!(!ApiCredential::is_available("INTENTROUTE_TEST_SECRETS_MISSING"));
    }

    #[test]
    fn test_blank_env_counts_as_missing() {
        std::env::set_var("INTENTROUTE_TEST_SECRETS_BLANK", "  ");
        assert!(ApiCredential::from_env("INTENTROUTE_TEST_SECRETS_BLANK", "Test key").is_err());
        assert!(!ApiCredential::is_available("INTENTROUTE_TEST_SECRETS_BLANK"));
        std::env::remove_var("INTENTROUTE_TEST_SECRETS_BLANK");
    }
}
