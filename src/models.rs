//! Data models and structures
//!
//! Defines the transient chat payloads exchanged with the web page and the
//! process configuration read at startup.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inbound chat payload posted by the website.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: String,
}

/// Body of a successful (200) chat reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Body of a degraded (500) chat reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub response: String,
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = crate::ai::gemini::client::DEFAULT_BASE_URL;
pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub upstream_timeout: Duration,
    /// Name of the environment variable holding the Gemini key. The key
    /// itself is looked up per request by `EnvCredentials`.
    pub api_key_var: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                crate::Error::Config(format!(
                    "UPSTREAM_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            api_key_var: lookup("GEMINI_API_KEY_VAR")
                .unwrap_or_else(|| DEFAULT_API_KEY_VAR.to_string()),
        })
    }
}
