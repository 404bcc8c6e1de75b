use std::sync::Arc;

use ai::{
    chat_completions::{ChatCompletion, ChatCompletionMessage, ChatCompletionRequestBuilder},
    clients::openai::Client,
};
use serde::de::DeserializeOwned;
use standard_error::{Interpolate, StandardError};

use crate::{conf::settings, prelude::Result};

/// Generation parameters for one structured completion call. Callers override
/// per stage; everything else stays at the defaults.
#[derive(Debug, Clone, Copy)]
pub struct GenConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            temperature: 0.2,
            top_p: 1.0,
            max_output_tokens: 8192,
        }
    }
}

impl GenConfig {
    pub fn with_temperature(temperature: f32) -> Self {
        GenConfig {
            temperature,
            ..GenConfig::default()
        }
    }
}

/// Models sometimes wrap their JSON answer in a markdown fence even when told
/// not to; both the fenced and the bare form must parse to the same value.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[async_trait::async_trait]
pub trait GenerateOps {
    /// One JSON-mode completion call. Transport failures and unparseable
    /// output both surface as upstream errors, which the queue treats as
    /// retryable.
    async fn structured_query<T: DeserializeOwned>(
        &self,
        prompt: &str,
        config: GenConfig,
    ) -> Result<T>;
}

#[async_trait::async_trait]
impl GenerateOps for Arc<Client> {
    async fn structured_query<T: DeserializeOwned>(
        &self,
        prompt: &str,
        config: GenConfig,
    ) -> Result<T> {
        let request = ChatCompletionRequestBuilder::default()
            .model(&settings.ai_model)
            .messages(vec![ChatCompletionMessage::User(prompt.to_owned().into())])
            .temperature(config.temperature)
            .max_completion_tokens(config.max_output_tokens)
            .build()
            .map_err(|e| StandardError::new("ERR-AI-001").interpolate_err(e.to_string()))?;
        let response = self
            .chat_completions(&request)
            .await
            .map_err(|e| StandardError::new("ERR-AI-002").interpolate_err(e.to_string()))?;
        let raw = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .ok_or_else(|| {
                StandardError::new("ERR-AI-002").interpolate_err("empty completion".into())
            })?
            .clone();
        let parsed = serde_json::from_str(strip_code_fences(&raw))
            .map_err(|e| StandardError::new("ERR-AI-003").interpolate_err(e.to_string()))?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::strip_code_fences;
    use serde_json::Value;

    #[test]
    fn test_fenced_and_bare_json_parse_identically() {
        let fenced: Value =
            serde_json::from_str(strip_code_fences("```json\n{\"a\":1}\n```")).unwrap();
        let bare: Value = serde_json::from_str(strip_code_fences("{\"a\":1}")).unwrap();
        assert_eq!(fenced, bare);
        assert_eq!(bare["a"], 1);
    }

    #[test]
    fn test_strips_anonymous_fence() {
        assert_eq!(strip_code_fences("```\n{\"b\":2}\n```"), "{\"b\":2}");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_code_fences("  {\"c\":3} "), "{\"c\":3}");
    }
}
