//! Narrative LLM client
//!
//! Two kinds of call go out: a JSON tactical briefing and a short prose wave
//! report. Each call carries its own [`CallProfile`]; the body is shaped per
//! provider and everything after that (auth, status, text extraction) shares
//! one path.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::core::error::NarrativeError;

type Result<T> = std::result::Result<T, NarrativeError>;

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Wire dialect spoken by the configured endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    /// Any `/chat/completions` endpoint
    OpenAiCompatible,
}

impl Provider {
    pub fn for_endpoint(url: &str) -> Self {
        if url.contains("anthropic.com") {
            Provider::Anthropic
        } else {
            Provider::OpenAiCompatible
        }
    }
}

/// Per-call generation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallProfile {
    pub max_tokens: u32,
    pub temperature: f32,
    /// The reply must be a single JSON object
    pub json: bool,
}

impl CallProfile {
    /// Recon SITREP: one compact JSON object
    pub const BRIEFING: CallProfile = CallProfile {
        max_tokens: 400,
        temperature: 0.7,
        json: true,
    };

    /// Two or three sentences of combat prose
    pub const WAVE: CallProfile = CallProfile {
        max_tokens: 160,
        temperature: 0.9,
        json: false,
    };
}

pub struct LlmClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    provider: Provider,
}

impl LlmClient {
    pub fn new(api_key: String, endpoint: String, model: String) -> Self {
        let provider = Provider::for_endpoint(&endpoint);
        Self {
            http: Client::new(),
            endpoint,
            api_key,
            model,
            provider,
        }
    }

    /// Configure from `LLM_API_KEY`, `LLM_API_URL` and `LLM_MODEL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| NarrativeError::NotConfigured("LLM_API_KEY not set".into()))?;
        let endpoint = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Ok(Self::new(api_key, endpoint, model))
    }

    /// Bound each HTTP request. The session applies its own timeout on top.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NarrativeError::Request(e.to_string()))?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Send one narrative request and return the reply text
    pub async fn complete(&self, system: &str, user: &str, profile: CallProfile) -> Result<String> {
        let body = request_body(self.provider, &self.model, system, user, profile);

        let request = self.http.post(&self.endpoint).json(&body);
        let request = match self.provider {
            Provider::Anthropic => request
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            Provider::OpenAiCompatible => request.bearer_auth(&self.api_key),
        };

        let response = request
            .send()
            .await
            .map_err(|e| NarrativeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "narrator request rejected");
            return Err(NarrativeError::Api(format!("{}: {}", status, detail)));
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|e| NarrativeError::Request(e.to_string()))?;
        let text = reply_text(self.provider, &reply, profile)?;
        tracing::debug!(model = %self.model, chars = text.len(), "narrator replied");
        Ok(text)
    }
}

/// Build the provider-specific request body.
///
/// Anthropic has no JSON mode, so JSON calls prefill the assistant turn with
/// `{`; [`reply_text`] puts it back.
pub fn request_body(
    provider: Provider,
    model: &str,
    system: &str,
    user: &str,
    profile: CallProfile,
) -> Value {
    match provider {
        Provider::Anthropic => {
            let mut messages = vec![json!({ "role": "user", "content": user })];
            if profile.json {
                messages.push(json!({ "role": "assistant", "content": "{" }));
            }
            json!({
                "model": model,
                "max_tokens": profile.max_tokens,
                "temperature": profile.temperature,
                "system": system,
                "messages": messages,
            })
        }
        Provider::OpenAiCompatible => {
            let mut body = json!({
                "model": model,
                "max_tokens": profile.max_tokens,
                "temperature": profile.temperature,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": user },
                ],
            });
            if profile.json {
                body["response_format"] = json!({ "type": "json_object" });
            }
            body
        }
    }
}

/// Pull the reply text out of a provider response
pub fn reply_text(provider: Provider, reply: &Value, profile: CallProfile) -> Result<String> {
    let text = match provider {
        Provider::Anthropic => reply["content"]
            .as_array()
            .and_then(|blocks| blocks.iter().find(|b| b["type"] == "text"))
            .and_then(|block| block["text"].as_str()),
        Provider::OpenAiCompatible => reply["choices"][0]["message"]["content"].as_str(),
    };

    let text = text.map(str::trim).filter(|t| !t.is_empty());
    match (text, provider, profile.json) {
        (None, _, _) => Err(NarrativeError::EmptyResponse),
        (Some(t), Provider::Anthropic, true) if !t.starts_with('{') => Ok(format!("{{{}", t)),
        (Some(t), _, _) => Ok(t.to_string()),
    }
}
