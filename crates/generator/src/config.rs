//! Endpoint configuration read from the environment.

use deck_core::{Error, Result};

/// Environment variable holding the generation endpoint URL.
pub const API_URL_VAR: &str = "DECK_BUILDER_API_URL";

/// Environment variable holding the bearer token.
pub const API_KEY_VAR: &str = "DECK_BUILDER_API_KEY";

/// Model identifier sent with every request.
pub const MODEL_ID: &str = "deck-builder-v1";

/// Settings for talking to the generation endpoint.
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Full URL requests are POSTed to.
    pub endpoint: String,

    /// Bearer token.
    pub api_key: String,

    /// Model identifier placed in the request body.
    pub model: String,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl GeneratorConfig {
    /// Create a config with the standard model identifier.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: MODEL_ID.to_string(),
        }
    }

    /// Read the endpoint and key from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the endpoint and key through a lookup function.
    ///
    /// Both values are required; unset or blank values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingConfig(name))
        };

        let endpoint = required(API_URL_VAR)?;
        let api_key = required(API_KEY_VAR)?;
        Ok(Self::new(endpoint, api_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = GeneratorConfig::from_lookup(lookup(&[
            (API_URL_VAR, " https://api.example.com/generate "),
            (API_KEY_VAR, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "https://api.example.com/generate");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, MODEL_ID);
    }

    #[test]
    fn test_missing_url() {
        let err = GeneratorConfig::from_lookup(lookup(&[(API_KEY_VAR, "secret")])).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(API_URL_VAR)));
    }

    #[test]
    fn test_blank_key() {
        let err = GeneratorConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://api.example.com"),
            (API_KEY_VAR, "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::MissingConfig(API_KEY_VAR)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeneratorConfig::new("https://api.example.com", "secret");
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
