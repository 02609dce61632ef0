//! Gemini `generateContent` provider
//!
//! The API key travels in the `x-goog-api-key` header, never the query string.

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{GenerateContentRequest, GenerateContentResponse},
    services::providers::GenerativeProvider,
};
use reqwest::Client as HttpClient;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(config: &Config) -> Self {
        Self::with_client(config, HttpClient::new())
    }

    pub fn with_client(config: &Config, http_client: HttpClient) -> Self {
        let model = config
            .gemini_model
            .strip_prefix("models/")
            .unwrap_or(&config.gemini_model)
            .to_string();

        Self {
            http_client,
            api_key: config.api_key().map(str::to_string),
            api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }
}

#[async_trait::async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> AppResult<GenerateContentResponse> {
        let api_key = self.api_key.as_deref().ok_or(AppError::MissingApiKey)?;

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                provider = self.name(),
                body = %body,
                "Gemini API returned an error status"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let decoded: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %body, "Failed to decode Gemini response");
            AppError::InvalidResponse(format!(
                "response body is not a generateContent envelope ({})",
                e
            ))
        })?;

        tracing::debug!(
            candidates = decoded.candidates.len(),
            model = %self.model,
            "Gemini response received"
        );

        Ok(decoded)
    }

    fn ensure_configured(&self) -> AppResult<()> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(AppError::MissingApiKey),
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, GenerationConfig, Part};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn config(server: &MockServer, api_key: Option<&str>) -> Config {
        Config {
            gemini_api_key: api_key.map(str::to_string),
            gemini_api_url: server.uri(),
            gemini_model: "gemini-2.0-flash".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_bytes: 1024,
        }
    }

    fn sample_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::Text {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: json!({ "type": "OBJECT" }),
            },
        }
    }

    #[tokio::test]
    async fn test_generate_content_sends_key_and_parses_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(&config(&server, Some("test-key")));
        let response = provider.generate_content(&sample_request()).await.unwrap();

        assert_eq!(response.first_text(), Some("{}"));
    }

    #[tokio::test]
    async fn test_error_status_keeps_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(&config(&server, Some("test-key")));
        let err = provider.generate_content(&sample_request()).await.unwrap_err();

        match err {
            AppError::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(&config(&server, Some("test-key")));
        let err = provider.generate_content(&sample_request()).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(&config(&server, None));

        assert!(matches!(
            provider.ensure_configured(),
            Err(AppError::MissingApiKey)
        ));
        let err = provider.generate_content(&sample_request()).await.unwrap_err();
        assert!(matches!(err, AppError::MissingApiKey));
    }

    #[test]
    fn test_model_prefix_is_stripped() {
        let config = Config {
            gemini_api_key: Some("k".to_string()),
            gemini_api_url: "https://example.test/".to_string(),
            gemini_model: "models/gemini-2.5-flash".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_bytes: 1024,
        };
        let provider = GeminiProvider::new(&config);

        assert_eq!(provider.model(), "gemini-2.5-flash");
        assert_eq!(
            provider.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
