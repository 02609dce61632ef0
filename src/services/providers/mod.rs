//! Generative model provider abstraction
//!
//! The recommendation pipeline builds a `generateContent` request and hands it
//! to a provider; `GeminiProvider` is the live implementation.

use crate::{
    error::AppResult,
    models::{GenerateContentRequest, GenerateContentResponse},
};

pub mod gemini;

/// Trait for generative model backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Send one `generateContent` request and decode the response envelope
    ///
    /// Implementations make a single attempt: no retries and no timeout beyond
    /// the transport default.
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> AppResult<GenerateContentResponse>;

    /// Fail fast when the provider lacks credentials
    ///
    /// Called before any request is built so a misconfigured gateway never
    /// reaches the network.
    fn ensure_configured(&self) -> AppResult<()>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
