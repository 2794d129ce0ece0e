//! Error handling and custom error types
//!
//! Every failure of a chat request is one of these variants. The HTTP layer
//! turns any of them into the uniform degraded 500 reply, so the `Display`
//! text of each variant is what the caller sees in the `error` field.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The upstream credential is missing from process configuration.
    #[error("{0}")]
    Configuration(String),

    /// The generative API answered with a non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The generative API answered 2xx but the body did not match its schema.
    #[error("Malformed Gemini response: {0}")]
    MalformedResponse(String),

    /// Network, DNS or timeout failure while calling the generative API.
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid request body: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// The inbound body could not be read or exceeded the size limit.
    #[error("Failed to read request body: {0}")]
    RequestBody(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_displays_bare_message() {
        let err = Error::Configuration("Gemini API key not configured".to_string());
        assert_eq!(err.to_string(), "Gemini API key not configured");
    }

    #[test]
    fn test_upstream_error_displays_upstream_message() {
        let err = Error::Upstream {
            status: 400,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.to_string(), "API key not valid");
    }

    #[test]
    fn test_invalid_request_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(err.to_string().starts_with("Invalid request body"));
    }
}
