//! Generative-language integration for patient chat.
//!
//! The proxy talks to the model through [`ChatService`]; Gemini is the
//! production implementation and [`MockChatClient`] scripts replies in tests.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiChatClient;
pub use mock::{MockChatClient, MockReply};

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send `prompt` upstream once and return the first text the model
    /// produced, or `None` when the reply carried no usable text.
    async fn generate_text(&self, api_key: &str, prompt: &str) -> Result<Option<String>>;
}
