use async_trait::async_trait;
use autokit_core::{BotConfig, CoreError, LlmError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const PROVIDER_NAME: &str = "OpenAI";
const SYSTEM_ROLE: &str = "You're a social media manager for a tech company.";

/// The post length the prompt asks for. Completions are trusted, not
/// enforced; an oversized one is logged and returned as-is.
const MAX_POST_CHARS: usize = 280;

/// Generates one plain-text post for a content theme.
#[async_trait]
pub trait LlmProvider {
    async fn generate_post(&self, theme: &str) -> Result<String, CoreError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionMessage {
    content: Option<String>,
}

#[derive(Debug)]
pub struct OpenAiProvider {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, temperature: f32, max_tokens: u32) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            api_key,
            base_url: OPENAI_API_BASE.to_string(),
            model,
            temperature,
            max_tokens,
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            config.openai_api_key.clone(),
            config.model.clone(),
            config.temperature,
            config.max_tokens,
        )
    }

    /// Point the provider at a different endpoint. Used by tests to talk to
    /// a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_prompt(theme: &str) -> String {
        format!(
            "Create an engaging tweet about {theme} for a tech-savvy audience.\n\
             - Maximum 280 characters\n\
             - Include 1-2 relevant hashtags\n\
             - Use an informal but professional tone\n\
             - Add emoji if appropriate"
        )
    }

    fn map_error_status(&self, status: StatusCode, retry_after: Option<u64>) -> LlmError {
        match status.as_u16() {
            401 => LlmError::InvalidApiKey {
                provider: PROVIDER_NAME.to_string(),
            },
            404 => LlmError::ModelNotAvailable {
                model: self.model.clone(),
            },
            429 => LlmError::RateLimitExceeded {
                provider: PROVIDER_NAME.to_string(),
                retry_after: retry_after.unwrap_or(60),
            },
            code if status.is_server_error() => {
                error!("OpenAI server error: {}", code);
                LlmError::ServiceUnavailable {
                    provider: PROVIDER_NAME.to_string(),
                }
            }
            _ => LlmError::InvalidResponseFormat {
                provider: PROVIDER_NAME.to_string(),
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate_post(&self, theme: &str) -> Result<String, CoreError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_ROLE.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::build_prompt(theme),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        info!("Requesting completion for theme '{}'", theme);
        let response = match self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Network error calling OpenAI: {}", e);
                if e.is_timeout() {
                    return Err(CoreError::Llm(LlmError::RequestTimeout {
                        provider: PROVIDER_NAME.to_string(),
                    }));
                }
                return Err(CoreError::Network(e));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            error!("OpenAI request failed with status {}", status);
            return Err(CoreError::Llm(self.map_error_status(status, retry_after)));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse completion response: {}", e);
            CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: PROVIDER_NAME.to_string(),
            })
        })?;

        let text = extract_completion_text(&completion)?;
        debug!("Generated {} characters for theme '{}'", text.chars().count(), theme);

        if text.chars().count() > MAX_POST_CHARS {
            // The prompt asks for 280 characters but nothing enforces it.
            warn!(
                "Completion exceeds {} characters ({}); posting it unmodified",
                MAX_POST_CHARS,
                text.chars().count()
            );
        }

        Ok(text)
    }
}

fn extract_completion_text(completion: &ChatCompletionResponse) -> Result<String, CoreError> {
    let text = completion
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: PROVIDER_NAME.to_string(),
            })
        })?;

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_theme_and_constraints() {
        let prompt = OpenAiProvider::build_prompt("coding tips");
        assert!(prompt.contains("coding tips"));
        assert!(prompt.contains("280 characters"));
        assert!(prompt.contains("1-2 relevant hashtags"));
    }

    #[test]
    fn test_extracts_and_trims_completion_text() {
        let completion: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  Rust tip! #rustlang  "}}]
        }))
        .unwrap();

        let text = extract_completion_text(&completion).unwrap();
        assert_eq!(text, "Rust tip! #rustlang");
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let completion: ChatCompletionResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();

        let result = extract_completion_text(&completion);
        assert!(matches!(
            result,
            Err(CoreError::Llm(LlmError::InvalidResponseFormat { .. }))
        ));
    }

    #[test]
    fn test_blank_completion_is_an_error() {
        let completion: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "   "}}]
        }))
        .unwrap();

        assert!(extract_completion_text(&completion).is_err());
    }
}
