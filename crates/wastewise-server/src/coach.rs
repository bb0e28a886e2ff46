//! Coach reply backends.
//!
//! `Canned` answers offline from the household context. `Gemini` calls the
//! Generative Language `generateContent` endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wastewise_core::coach::{canned_reply, system_prompt, ChatRole, ChatTurn, CoachContext};
use wastewise_core::config::{CoachBackendConfig, CoachConfig};
use wastewise_core::error::WasteError;

#[derive(Debug, Error)]
pub enum CoachBackendError {
    #[error("environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend returned no text")]
    EmptyReply,
}

impl From<CoachBackendError> for WasteError {
    fn from(e: CoachBackendError) -> Self {
        WasteError::Coach(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Gemini wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn text_content(role: &str, text: &str) -> Content {
    Content {
        role: Some(role.to_string()),
        parts: vec![Part {
            text: text.to_string(),
        }],
    }
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key_env: impl Into<String>,
        api_key: Option<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key_env: api_key_env.into(),
            api_key,
            temperature,
            max_tokens,
        }
    }

    fn request_body(&self, ctx: &CoachContext, history: &[ChatTurn], message: &str) -> GenerateRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "model",
                };
                text_content(role, &turn.content)
            })
            .collect();
        contents.push(text_content("user", message));

        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt(ctx),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        }
    }

    pub async fn generate(
        &self,
        ctx: &CoachContext,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, CoachBackendError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CoachBackendError::MissingApiKey(self.api_key_env.clone()))?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&self.request_body(ctx, history, message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoachBackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            return Err(CoachBackendError::EmptyReply);
        }
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// CoachBackend
// ---------------------------------------------------------------------------

pub enum CoachBackend {
    Canned,
    Gemini(GeminiClient),
}

impl CoachBackend {
    pub fn from_config(cfg: &CoachConfig) -> Self {
        match &cfg.backend {
            CoachBackendConfig::Canned => CoachBackend::Canned,
            CoachBackendConfig::Gemini {
                model,
                api_key_env,
                base_url,
            } => {
                let api_key = std::env::var(api_key_env).ok().filter(|k| !k.is_empty());
                if api_key.is_none() {
                    tracing::warn!(env = %api_key_env, "coach API key not set");
                }
                CoachBackend::Gemini(GeminiClient::new(
                    base_url.as_str(),
                    model.as_str(),
                    api_key_env.as_str(),
                    api_key,
                    cfg.temperature,
                    cfg.max_tokens,
                ))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CoachBackend::Canned => "canned",
            CoachBackend::Gemini(_) => "gemini",
        }
    }

    pub async fn reply(
        &self,
        ctx: &CoachContext,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, CoachBackendError> {
        match self {
            CoachBackend::Canned => Ok(canned_reply(ctx, history, message)),
            CoachBackend::Gemini(client) => client.generate(ctx, history, message).await,
        }
    }
}
