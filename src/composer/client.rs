use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    models::{Recommendation, RecommendationRequest},
    routes::RECOMMENDATIONS_PATH,
};

/// Shown when the gateway fails without a usable message
pub const GENERIC_SERVER_ERROR: &str = "The server returned an error.";

/// Failures talking to the gateway, rendered as the user-facing message
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("The server returned an invalid response.")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Transport used by the composer to reach the gateway
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GatewayClient: Send + Sync {
    async fn fetch_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Recommendation>, GatewayError>;
}

/// `GatewayClient` that posts JSON to a running gateway
#[derive(Clone)]
pub struct HttpGatewayClient {
    http_client: HttpClient,
    base_url: String,
}

impl HttpGatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, HttpClient::new())
    }

    pub fn with_client(base_url: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, RECOMMENDATIONS_PATH)
    }
}

#[async_trait::async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn fetch_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Recommendation>, GatewayError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|error| error.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());

            tracing::warn!(
                status = status.as_u16(),
                message = %message,
                "Gateway returned an error"
            );

            return Err(GatewayError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Malformed(e.to_string()))
    }
}
