//! Blocking client for the generation endpoint.

use crate::config::GeneratorConfig;
use deck_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Something that turns a prompt into a raw generation response.
pub trait DeckGenerator {
    /// Send the prompt and return the parsed JSON body.
    fn generate(&self, prompt: &str) -> Result<Value>;
}

/// Request body sent to the endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    model: &'a str,
}

/// Client for the generation endpoint.
pub struct GenerationClient {
    config: GeneratorConfig,
    http: reqwest::blocking::Client,
}

impl std::fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl GenerationClient {
    /// Create a client for the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Result<Self> {
        GeneratorConfig::from_env().map(Self::new)
    }
}

impl DeckGenerator for GenerationClient {
    fn generate(&self, prompt: &str) -> Result<Value> {
        let body = GenerateRequest {
            prompt,
            model: &self.config.model,
        };

        log::debug!("POST {} (model={})", self.config.endpoint, self.config.model);

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::Transport(format!("POST {}: {}", self.config.endpoint, e)))?;

        let status = response.status();
        let raw = response
            .text()
            .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;

        log::debug!("Generation endpoint answered {} ({} bytes)", status, raw.len());

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                detail: error_detail(&raw),
            });
        }

        serde_json::from_str(&raw).map_err(|e| Error::InvalidResponse {
            status: status.as_u16(),
            detail: e.to_string(),
        })
    }
}

/// Best-effort error detail from a failed response body.
///
/// Looks at `error.message`, `error` and `message`, in that order, and
/// falls back to the raw body.
fn error_detail(raw: &str) -> String {
    let from_json = serde_json::from_str::<Value>(raw).ok().and_then(|value| {
        value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .or_else(|| value.get("error").and_then(Value::as_str))
            .or_else(|| value.get("message").and_then(Value::as_str))
            .map(str::to_string)
    });

    match from_json {
        Some(message) => message,
        None if raw.trim().is_empty() => "empty response body".to_string(),
        None => raw.trim().to_string(),
    }
}
