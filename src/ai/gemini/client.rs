use super::types::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Used when a non-2xx body carries no `error.message`.
pub const GENERIC_UPSTREAM_ERROR: &str = "Failed to get response from Gemini API";

/// Lightweight Gemini REST client. Holds no credential; the key is supplied
/// per call.
pub struct GeminiHttpClient {
    client: Client,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-1.5-flash`);
    /// a leading `models/` is stripped.
    #[cfg(test)]
    pub fn new(model: String, timeout: Duration) -> Self {
        Self::new_with_client(model, timeout, Client::new())
    }

    pub fn new_with_client(model: String, timeout: Duration, client: Client) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Calls Gemini's `generateContent` endpoint once. No retries.
    pub async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        tracing::debug!(model = %self.model, "Sending generateContent request to Gemini");

        let response = self
            .client
            .post(self.generate_content_url())
            .query(&[("key", api_key)])
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the key as a query parameter.
                let e = e.without_url();
                tracing::error!("Failed to send request to Gemini: {}", e);
                Error::Transport(e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;

        if !status.is_success() {
            tracing::error!("Gemini API error (status {}): {}", status, body);
            return Err(Error::Upstream {
                status: status.as_u16(),
                message: upstream_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::MalformedResponse(e.to_string())
        })
    }
}

fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string())
}
