use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;
use tutor_core::llm_client::GenerationSettings;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported OpenAI-compatible providers for tutor text generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    DeepSeek,
    OpenAI,
    Gemini,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::DeepSeek => "https://api.deepseek.com",
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::DeepSeek => "deepseek-chat",
            Provider::OpenAI => "gpt-4o",
            Provider::Gemini => "gemini-2.0-flash",
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            Provider::DeepSeek => "DEEPSEEK_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub provider: Provider,
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub log_level: Level,
    pub catalog_path: PathBuf,
    pub prompts_path: PathBuf,
    pub default_course_id: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let provider_str = std::env::var("AI_PROVIDER").unwrap_or_else(|_| "deepseek".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "deepseek" => Provider::DeepSeek,
            "openai" => Provider::OpenAI,
            "gemini" => Provider::Gemini,
            other => {
                return Err(ConfigError::InvalidValue(
                    "AI_PROVIDER".to_string(),
                    format!("'{}' is not one of deepseek, openai, gemini", other),
                ));
            }
        };

        let mut api_key = std::env::var(provider.api_key_var()).ok();
        if api_key.is_none() && provider == Provider::DeepSeek {
            api_key = std::env::var("DEEPSEEK").ok();
        }
        let api_key = api_key.filter(|key| !key.trim().is_empty()).ok_or_else(|| {
            ConfigError::MissingVar(format!(
                "{} must be set for '{}' provider",
                provider.api_key_var(),
                provider_str.to_lowercase()
            ))
        })?;

        let base_url = std::env::var("AI_BASE_URL")
            .unwrap_or_else(|_| provider.default_base_url().to_string());

        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| provider.default_model().to_string());

        let temperature = match std::env::var("CHAT_TEMPERATURE") {
            Ok(value) => value
                .parse::<f32>()
                .ok()
                .filter(|t| (0.0..=2.0).contains(t))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "CHAT_TEMPERATURE".to_string(),
                        format!("'{}' is not a number between 0.0 and 2.0", value),
                    )
                })?,
            Err(_) => 0.7,
        };

        let max_tokens = match std::env::var("CHAT_MAX_TOKENS") {
            Ok(value) => value
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "CHAT_MAX_TOKENS".to_string(),
                        format!("'{}' is not a positive integer", value),
                    )
                })?,
            Err(_) => 250,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let catalog_path = std::env::var("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./content/courses.json"));

        let prompts_path = std::env::var("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./prompts"));

        let default_course_id =
            std::env::var("DEFAULT_COURSE_ID").unwrap_or_else(|_| "python-basics".to_string());

        Ok(Self {
            bind_address,
            provider,
            api_key,
            base_url,
            chat_model,
            temperature,
            max_tokens,
            log_level,
            catalog_path,
            prompts_path,
            default_course_id,
        })
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            model: self.chat_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
