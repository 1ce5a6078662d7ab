use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, error};

/// Text returned in place of generated content when the provider call fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having a technical issue at the moment. Please try again.";

/// A text generator that turns a system and a user instruction into tutor prose.
///
/// Implementations must never fail: provider errors are logged and replaced
/// with [`FALLBACK_REPLY`] so a lesson can always continue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TutorClient: Send + Sync {
    async fn generate(&self, system_instruction: &str, user_instruction: &str) -> String;
}

/// Sampling parameters applied to every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
            max_tokens: 250,
        }
    }
}

/// An implementation of `TutorClient` for any OpenAI-compatible chat API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    settings: GenerationSettings,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - API key and base URL of the provider.
    /// * `settings` - Model and sampling parameters used for every request.
    pub fn new(config: OpenAIConfig, settings: GenerationSettings) -> Self {
        Self {
            client: Client::with_config(config),
            settings,
        }
    }

    #[allow(deprecated)]
    async fn try_generate(&self, system_instruction: &str, user_instruction: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.settings.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_instruction)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_instruction)
                    .build()?
                    .into(),
            ])
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .context("No response choice from LLM")?
            .message
            .content
            .context("No content in LLM response")?;

        if content.trim().is_empty() {
            anyhow::bail!("LLM returned empty content");
        }
        Ok(content)
    }
}

#[async_trait]
impl TutorClient for OpenAICompatibleClient {
    async fn generate(&self, system_instruction: &str, user_instruction: &str) -> String {
        match self.try_generate(system_instruction, user_instruction).await {
            Ok(text) => {
                debug!(model = %self.settings.model, chars = text.len(), "Generated tutor text");
                text
            }
            Err(e) => {
                error!(model = %self.settings.model, error = ?e, "Tutor AI call failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

/// A deterministic `TutorClient` for development and integration testing.
///
/// Replies are handed out in the order they were scripted. Once the script is
/// exhausted every further call returns [`FALLBACK_REPLY`], mirroring an
/// unavailable provider. Every call is recorded for later inspection.
#[derive(Default)]
pub struct ScriptedTutorClient {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTutorClient {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(system_instruction, user_instruction)` pair received so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TutorClient for ScriptedTutorClient {
    async fn generate(&self, system_instruction: &str, user_instruction: &str) -> String {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((system_instruction.to_string(), user_instruction.to_string()));

        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_generation_settings() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.model, "deepseek-chat");
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_tokens, 250);
    }

    #[tokio::test]
    async fn test_scripted_client_replays_in_order() {
        let client = ScriptedTutorClient::new(["first", "second"]);

        assert_eq!(client.generate("sys", "one").await, "first");
        assert_eq!(client.generate("sys", "two").await, "second");
        assert_eq!(client.generate("sys", "three").await, FALLBACK_REPLY);

        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], ("sys".to_string(), "two".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_provider_returns_fallback() {
        let config = OpenAIConfig::new()
            .with_api_key("test-key")
            .with_api_base("http://127.0.0.1:9");
        let client = OpenAICompatibleClient::new(config, GenerationSettings::default());

        let text = client.generate("system", "user").await;
        assert_eq!(text, FALLBACK_REPLY);
    }
}
