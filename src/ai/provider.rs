//! AI completion providers
//!
//! Thin blocking HTTP clients for the OpenAI, Anthropic and Gemini chat
//! endpoints, plus an offline mock. `complete(system, user)` is the whole
//! contract; the surrounding commands decide what goes in and what the
//! output feeds into.

use clap::ValueEnum;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use thiserror::Error;

use crate::core::config::{Config, ProviderSettings};

/// AI completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Offline canned responses, no network
    #[default]
    Mock,
    Openai,
    Claude,
    Gemini,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Mock => write!(f, "mock"),
            Provider::Openai => write!(f, "openai"),
            Provider::Claude => write!(f, "claude"),
            Provider::Gemini => write!(f, "gemini"),
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Provider::Mock),
            "openai" => Ok(Provider::Openai),
            "claude" | "anthropic" => Ok(Provider::Claude),
            "gemini" | "google" => Ok(Provider::Gemini),
            _ => Err(format!(
                "Unknown provider: '{}'. Supported: mock, openai, claude, gemini",
                s
            )),
        }
    }
}

/// Errors that can occur when calling a completion provider
#[derive(Debug, Error)]
pub enum AiError {
    #[error("No API key configured for {provider}. Set {env_var} or add it to config.yaml")]
    MissingApiKey { provider: Provider, env_var: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response shape: {message}")]
    MalformedResponse { message: String },
}

/// Resolved connection settings for one provider endpoint
#[derive(Debug, Clone)]
struct EndpointConfig {
    api_key: Option<String>,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f32,
}

impl EndpointConfig {
    fn resolve(settings: &ProviderSettings, model: &str, endpoint: &str) -> Self {
        EndpointConfig {
            api_key: settings.api_key.clone(),
            model: settings.model.clone().unwrap_or_else(|| model.to_string()),
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| endpoint.to_string()),
            max_tokens: settings.max_tokens.unwrap_or(500),
            temperature: settings.temperature.unwrap_or(0.7),
        }
    }

    fn api_key(&self, provider: Provider, env_var: &str) -> Result<&str, AiError> {
        self.api_key.as_deref().ok_or_else(|| AiError::MissingApiKey {
            provider,
            env_var: env_var.to_string(),
        })
    }
}

/// Client for one configured provider
pub struct CompletionClient {
    provider: Provider,
    http: reqwest::blocking::Client,
    openai: EndpointConfig,
    claude: EndpointConfig,
    gemini: EndpointConfig,
}

impl CompletionClient {
    pub fn new(provider: Provider, config: &Config) -> Self {
        CompletionClient {
            provider,
            http: reqwest::blocking::Client::new(),
            openai: EndpointConfig::resolve(
                &config.openai,
                "gpt-4o-mini",
                "https://api.openai.com/v1/chat/completions",
            ),
            claude: EndpointConfig::resolve(
                &config.claude,
                "claude-3-5-haiku-latest",
                "https://api.anthropic.com/v1/messages",
            ),
            gemini: EndpointConfig::resolve(
                &config.gemini,
                "gemini-1.5-flash",
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent",
            ),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Run one completion. The mock provider is handled by the caller
    /// (it needs per-student data); here it degrades to echoing the user
    /// prompt so a misrouted call stays harmless.
    pub fn complete(&self, system: &str, user: &str) -> Result<String, AiError> {
        match self.provider {
            Provider::Mock => Ok(user.to_string()),
            Provider::Openai => self.call_openai(system, user),
            Provider::Claude => self.call_claude(system, user),
            Provider::Gemini => self.call_gemini(system, user),
        }
    }

    fn call_openai(&self, system: &str, user: &str) -> Result<String, AiError> {
        let cfg = &self.openai;
        let api_key = cfg.api_key(Provider::Openai, "OPENAI_API_KEY")?;

        let response = self
            .http
            .post(&cfg.endpoint)
            .bearer_auth(api_key)
            .json(&json!({
                "model": cfg.model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": user},
                ],
                "max_tokens": cfg.max_tokens,
                "temperature": cfg.temperature,
            }))
            .send()?;

        let body = check_status(response)?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| AiError::MalformedResponse {
                message: "missing choices[0].message.content".to_string(),
            })
    }

    fn call_claude(&self, system: &str, user: &str) -> Result<String, AiError> {
        let cfg = &self.claude;
        let api_key = cfg.api_key(Provider::Claude, "ANTHROPIC_API_KEY")?;

        let response = self
            .http
            .post(&cfg.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": cfg.model,
                "system": system,
                "messages": [
                    {"role": "user", "content": user},
                ],
                "max_tokens": cfg.max_tokens,
                "temperature": cfg.temperature,
            }))
            .send()?;

        let body = check_status(response)?;
        body["content"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| AiError::MalformedResponse {
                message: "missing content[0].text".to_string(),
            })
    }

    fn call_gemini(&self, system: &str, user: &str) -> Result<String, AiError> {
        let cfg = &self.gemini;
        let api_key = cfg.api_key(Provider::Gemini, "GEMINI_API_KEY")?;

        let response = self
            .http
            .post(format!("{}?key={}", cfg.endpoint, api_key))
            .json(&json!({
                "contents": [
                    {"parts": [{"text": format!("{}\n\n{}", system, user)}]}
                ],
                "generationConfig": {
                    "temperature": cfg.temperature,
                    "maxOutputTokens": cfg.max_tokens,
                }
            }))
            .send()?;

        let body = check_status(response)?;
        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| AiError::MalformedResponse {
                message: "missing candidates[0].content.parts[0].text".to_string(),
            })
    }
}

/// Turn non-2xx responses into `AiError::Api`, otherwise parse JSON.
fn check_status(response: reqwest::blocking::Response) -> Result<serde_json::Value, AiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().unwrap_or_default();
        return Err(AiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::Openai);
        assert_eq!("Claude".parse::<Provider>().unwrap(), Provider::Claude);
        assert_eq!("anthropic".parse::<Provider>().unwrap(), Provider::Claude);
        assert!("bedrock".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_display_round_trips() {
        for provider in [Provider::Mock, Provider::Openai, Provider::Claude, Provider::Gemini] {
            assert_eq!(provider.to_string().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::default();
        let client = CompletionClient::new(Provider::Openai, &config);
        let err = client.complete("system", "user").unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey { .. }));
    }

    #[test]
    fn test_model_override() {
        let mut config = Config::default();
        config.openai.model = Some("gpt-4o".to_string());
        let client = CompletionClient::new(Provider::Openai, &config);
        assert_eq!(client.openai.model, "gpt-4o");
    }
}
