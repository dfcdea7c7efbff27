//! Google Gemini provider implementation.
//!
//! Uses the `generateContent` endpoint. System messages are sent as the
//! request's system instruction; everything else becomes user content.
//! The classification oracle sends a single user prompt with the
//! instruction already prepended, so in practice only `contents` is set.

use async_trait::async_trait;
use intentroute_core::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http::{build_client, endpoint, send_json};
use super::{
    factory::ProviderFactory, secrets::ApiCredential, ChatMessage, CompletionConfig,
    CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};

/// Google Gemini provider.
pub struct GoogleProvider {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleProvider {
    pub fn new(credential: ApiCredential, base_url: impl Into<String>) -> Result<Self, ProviderError> {
        if credential.is_empty() {
            return Err(ProviderError::NotConfigured(format!("{} is empty", credential)));
        }

        Ok(Self {
            credential,
            base_url: base_url.into(),
            client: build_client()?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn text_content(text: String, role: Option<&str>) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part { text: Some(text) }],
    }
}

fn build_request(messages: Vec<ChatMessage>, config: &CompletionConfig) -> GenerateContentRequest {
    let mut system = Vec::new();
    let mut contents = Vec::new();

    for msg in messages {
        if msg.is_system() {
            system.push(msg.content);
        } else {
            let role = if msg.role == "assistant" { "model" } else { "user" };
            contents.push(text_content(msg.content, Some(role)));
        }
    }

    GenerateContentRequest {
        contents,
        system_instruction: (!system.is_empty()).then(|| text_content(system.join("\n\n"), None)),
        generation_config: GenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
        },
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = build_request(messages, config);
        let url = endpoint(
            &self.base_url,
            &format!("models/{}:generateContent", config.model),
        );

        // Only expose the credential here, at the point of use
        let builder = self
            .client
            .post(url)
            .header("x-goog-api-key", self.credential.expose())
            .json(&request);

        let body: GenerateContentResponse = send_json(builder, config.timeout).await?;

        let candidate = match body.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                let reason = body
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .map(|r| format!("prompt blocked: {}", r))
                    .unwrap_or_else(|| "no candidates returned".to_string());
                return Err(ProviderError::EmptyResponse(reason));
            }
        };

        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let usage = body
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage,
            model: body.model_version.unwrap_or_else(|| config.model.clone()),
        })
    }

    fn name(&self) -> &str {
        "google"
    }
}

/// Factory for Google Gemini providers.
pub struct GoogleProviderFactory;

impl ProviderFactory for GoogleProviderFactory {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn create(
        &self,
        config: &ProviderConfig,
        credential: ApiCredential,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(GoogleProvider::new(credential, config.base_url.clone())?))
    }

    fn description(&self) -> &'static str {
        "Google Gemini generateContent provider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_provider(base_url: &str) -> GoogleProvider {
        let credential = ApiCredential::new("AIza-test-key", "Google API key");
        GoogleProvider::new(credential, base_url).unwrap()
    }

    fn test_config() -> CompletionConfig {
        CompletionConfig {
            model: "gemini-2.5-flash".to_string(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_request_splits_system() {
        let request = build_request(
            vec![ChatMessage::system("Rules."), ChatMessage::user("Hi")],
            &test_config(),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Rules.");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hi");
        assert_eq!(json["generationConfig"]["temperature"], 0.0);
        assert!(json["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_build_request_single_prompt() {
        let request = build_request(vec![ChatMessage::user("Rules.\n\nUser query: Hi")], &test_config());
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn empty_credential_is_rejected() {
        let err = GoogleProvider::new(ApiCredential::new("", "Google API key"), "http://localhost").unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(err.to_string().contains("Google API key"));
    }

    #[tokio::test]
    async fn complete_calls_generate_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "AIza-test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "prompt"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "FA"}, {"text": "Q\n"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 70, "candidatesTokenCount": 1},
                "modelVersion": "gemini-2.5-flash"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let response = provider
            .complete(vec![ChatMessage::user("prompt")], &test_config())
            .await
            .unwrap();

        assert_eq!(response.content, "FAQ\n");
        assert_eq!(response.usage.prompt_tokens, 70);
        assert_eq!(response.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn complete_reports_blocked_prompt() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let err = provider
            .complete(vec![ChatMessage::user("prompt")], &test_config())
            .await
            .unwrap_err();

        match err {
            ProviderError::EmptyResponse(reason) => assert!(reason.contains("SAFETY")),
            other => panic!("Expected EmptyResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn complete_maps_quota_exhaustion() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let err = provider
            .complete(vec![ChatMessage::user("prompt")], &test_config())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited { retry_after: None }));
    }

    #[tokio::test]
    async fn complete_reports_bad_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let provider = test_provider(&server.uri());
        let err = provider
            .complete(vec![ChatMessage::user("prompt")], &test_config())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let provider = test_provider("http://localhost");
        let debug_output = format!("{:?}", provider);
        assert!(!debug_output.contains("AIza-test-key"));
    }
}
