//! HTTP plumbing shared by the hosted providers.

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::ProviderError;

/// Build the HTTP client a provider keeps for its lifetime.
pub(super) fn build_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| ProviderError::HttpError(format!("Failed to build HTTP client: {}", e)))
}

/// Join a base URL and a path without doubling the slash.
pub(super) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Send a request and decode a JSON body, mapping HTTP failures onto
/// [`ProviderError`].
pub(super) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, ProviderError> {
    let response = request.timeout(timeout).send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Timeout(timeout)
        } else {
            ProviderError::HttpError(e.to_string())
        }
    })?;

    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(ProviderError::RateLimited { retry_after });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProviderError::AuthError);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::ApiError {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::ParseError(e.to_string()))
}

/// Both providers wrap failures as `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
