//! Remote text-generation capability used by the diagnostic reporter.
//!
//! The reporter only sees the [`TextGenerator`] trait. [`GeminiClient`]
//! implements it over HTTPS; [`OfflineGenerator`] stands in when no
//! credential is configured.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{API_KEY_ENV, SentinelConfig};
use crate::error::{Error, Result};

/// One generation request: a model, a single prompt, and whether the body
/// should be JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub json_response: bool,
}

/// Anything that turns a prompt into response text.
///
/// `Ok(None)` means the capability answered without a body.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Always fails with [`Error::MissingCredential`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Option<String>> {
        Err(Error::MissingCredential(API_KEY_ENV))
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, `None` when there is none.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

fn request_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: [Content {
            parts: [RequestPart {
                text: &request.prompt,
            }],
        }],
        generation_config: request.json_response.then_some(GenerationConfig {
            response_mime_type: "application/json",
        }),
    }
}

/// Google generative-language API client.
///
/// No timeout is set on the HTTP client: the call runs until the transport
/// resolves it.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(endpoint: &str, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("boardsentinel/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.endpoint)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
        let url = self.url(&request.model);
        log::debug!("POST {url} ({} prompt chars)", request.prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let parsed: GenerateContentResponse = serde_json::from_str(&raw)?;
        Ok(parsed.into_text())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Pick the generator the configuration allows: Gemini with a credential,
/// offline otherwise.
pub fn generator_from_config(config: &SentinelConfig) -> Result<Box<dyn TextGenerator>> {
    match &config.api_key {
        Some(key) => Ok(Box::new(GeminiClient::new(&config.endpoint, key.clone())?)),
        None => {
            log::info!("{API_KEY_ENV} not set, AI diagnostics will run offline");
            Ok(Box::new(OfflineGenerator))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: bool) -> GenerationRequest {
        GenerationRequest {
            model: "gemini-3-flash-preview".into(),
            prompt: "hello".into(),
            json_response: json,
        }
    }

    #[test]
    fn request_body_shape() {
        let req = request(true);
        let body = serde_json::to_value(request_body(&req)).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn request_body_without_json_flag() {
        let req = request(false);
        let body = serde_json::to_value(request_body(&req)).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_concatenates_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"summary\":"},{"text":"\"ok\"}"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some(r#"{"summary":"ok"}"#));
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_text().is_none());
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[test]
    fn url_includes_model() {
        let client = GeminiClient::new("https://example.test/", "k".into()).unwrap();
        assert_eq!(
            client.url("gemini-3-flash-preview"),
            "https://example.test/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn offline_generator_reports_missing_credential() {
        let err = OfflineGenerator.generate(&request(true)).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential(API_KEY_ENV)));
    }

    #[test]
    fn config_without_key_selects_offline() {
        let generator = generator_from_config(&SentinelConfig::default()).unwrap();
        assert_eq!(generator.name(), "offline");
    }

    #[test]
    fn config_with_key_selects_gemini() {
        let config = SentinelConfig {
            api_key: Some("k".into()),
            ..Default::default()
        };
        assert_eq!(generator_from_config(&config).unwrap().name(), "gemini");
    }
}
