//! Upstream credential lookup.
//!
//! The proxy never reads the Gemini key from a global; it asks an injected
//! [`CredentialProvider`] on every request.

/// Source of the Gemini API key.
pub trait CredentialProvider: Send + Sync {
    /// Returns the key, or `None` when it is not configured.
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from an environment variable each time it is asked.
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        non_blank(std::env::var(&self.var).ok())
    }
}

/// A fixed key, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    key: Option<String>,
}

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    pub fn missing() -> Self {
        Self { key: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        non_blank(self.key.clone())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credentials() {
        assert_eq!(StaticCredentials::new("abc").api_key().as_deref(), Some("abc"));
        assert_eq!(StaticCredentials::missing().api_key(), None);
        assert_eq!(StaticCredentials::new("   ").api_key(), None);
    }

    #[test]
    fn test_env_credentials_missing_var() {
        let creds = EnvCredentials::new("DENTAL_CHAT_PROXY_TEST_UNSET_KEY_VAR");
        assert_eq!(creds.var(), "DENTAL_CHAT_PROXY_TEST_UNSET_KEY_VAR");
        assert_eq!(creds.api_key(), None);
    }

    #[test]
    fn test_env_credentials_read_per_call() {
        let var = "DENTAL_CHAT_PROXY_TEST_ROTATING_KEY";
        let creds = EnvCredentials::new(var);

        std::env::set_var(var, "first");
        assert_eq!(creds.api_key().as_deref(), Some("first"));

        std::env::set_var(var, "second");
        assert_eq!(creds.api_key().as_deref(), Some("second"));

        std::env::remove_var(var);
        assert_eq!(creds.api_key(), None);
    }
}
