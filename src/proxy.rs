//! The "complete chat" operation behind the HTTP endpoint.
//!
//! [`ChatProxy::complete_chat`] returns an explicit `Result`; mapping it to a
//! status code is left to the HTTP adapter in [`crate::server`].

use crate::ai::ChatService;
use crate::credentials::CredentialProvider;
use crate::models::ChatRequest;
use crate::prompts::{self, NO_ANSWER_FALLBACK};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, warn};

pub const MISSING_API_KEY: &str = "Gemini API key not configured";

/// Composes patient prompts and forwards them to the chat service.
#[derive(Clone)]
pub struct ChatProxy {
    chat: Arc<dyn ChatService>,
    credentials: Arc<dyn CredentialProvider>,
}

impl ChatProxy {
    pub fn new(chat: Arc<dyn ChatService>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { chat, credentials }
    }

    pub async fn complete_chat(&self, request: &ChatRequest) -> Result<String> {
        let api_key = self.credentials.api_key().ok_or_else(|| {
            error!("{}", MISSING_API_KEY);
            Error::Configuration(MISSING_API_KEY.to_string())
        })?;

        let prompt = prompts::compose_patient_prompt(&request.context, &request.message);

        match self.chat.generate_text(&api_key, &prompt).await? {
            Some(text) => Ok(text),
            None => {
                warn!("Gemini returned no candidate text, using fallback answer");
                Ok(NO_ANSWER_FALLBACK.to_string())
            }
        }
    }
}
