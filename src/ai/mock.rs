use super::ChatService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted outcome for one [`MockChatClient`] call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Upstream answered but carried no usable text.
    Empty,
    /// Upstream answered with a non-success status.
    UpstreamError { status: u16, message: String },
}

pub struct MockChatClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_reply(MockReply::Text(text.into()))
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn generate_text(&self, _api_key: &str, prompt: &str) -> Result<Option<String>> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.prompts.lock().unwrap().push(prompt.to_string());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Default mock response
            return Ok(Some(format!("Mock answer to a {}-line prompt", prompt.lines().count())));
        }

        match &replies[(count - 1) % replies.len()] {
            MockReply::Text(text) => Ok(Some(text.clone())),
            MockReply::Empty => Ok(None),
            MockReply::UpstreamError { status, message } => Err(Error::Upstream {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
