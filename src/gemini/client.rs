use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, Part};
use crate::config::{GeminiConfig, RequestConfig};
use crate::error::{GeminiError, GeminiResult};

/// Produces a text reply for a list of prompt parts.
///
/// Services depend on this trait rather than on [`GeminiClient`] directly,
/// so request handling can be exercised without the network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply and return its text
    async fn generate(&self, parts: Vec<Part>) -> GeminiResult<String>;
}

/// Client for the Gemini `generateContent` API
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    request_config: RequestConfig,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: &GeminiConfig, request_config: RequestConfig) -> GeminiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(GeminiError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            request_config,
        })
    }

    /// Call `generateContent` with the given request.
    ///
    /// A single attempt is made; failures are returned to the caller as-is.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.endpoint();
        let start = Instant::now();

        debug!(
            model = %self.model,
            parts = request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
            "Calling Gemini generateContent"
        );

        match self.execute_request(&url, request).await {
            Ok(response) => {
                info!(
                    model = %self.model,
                    latency_ms = start.elapsed().as_millis(),
                    total_tokens = ?response.usage_metadata.as_ref().and_then(|u| u.total_token_count),
                    "Gemini call succeeded"
                );
                Ok(response)
            }
            Err(e) => {
                error!(
                    model = %self.model,
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "Gemini call failed"
                );
                Err(e)
            }
        }
    }

    /// Execute a single request (internal)
    async fn execute_request(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&error_body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(error_body);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.classify_transport_error(e)
                } else {
                    GeminiError::InvalidResponse {
                        message: format!("Failed to parse response: {}", e),
                    }
                }
            })
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> GeminiError {
        if e.is_timeout() {
            GeminiError::Timeout {
                timeout_ms: self.request_config.timeout_ms,
            }
        } else {
            GeminiError::Http(e)
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Model this client generates with
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, parts: Vec<Part>) -> GeminiResult<String> {
        let response = self
            .generate_content(&GenerateContentRequest::new(parts))
            .await?;

        response.text().ok_or_else(|| GeminiError::EmptyResponse {
            reason: response.empty_reason(),
        })
    }
}
