use super::client::GeminiHttpClient;
use super::types::GenerateContentRequest;
use crate::ai::ChatService;
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiChatClient {
    http: GeminiHttpClient,
}

impl GeminiChatClient {
    pub fn new(model: String, timeout: Duration) -> Self {
        Self::new_with_client(model, timeout, reqwest::Client::new())
    }

    fn new_with_client(model: String, timeout: Duration, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }
}

#[async_trait]
impl ChatService for GeminiChatClient {
    async fn generate_text(&self, api_key: &str, prompt: &str) -> Result<Option<String>> {
        let request = GenerateContentRequest::from_prompt(prompt);
        let response = self.http.generate_content(api_key, &request).await?;
        Ok(response.first_text().map(str::to_string))
    }
}
