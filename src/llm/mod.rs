//! LLM integration for the garden assistant.
//!
//! Supports:
//! - **Gemini** (default), **Anthropic** and **OpenAI**, all through rig-core
//!
//! Every backend sits behind the `LlmProvider` trait so the chat service and
//! tests can swap in their own implementation.

mod rig_adapter;

pub use rig_adapter::RigAdapter;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rig::client::CompletionClient;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, LlmError};

/// A single-shot prompt: optional persona preamble plus the user prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: Option<String>,
    pub user: String,
}

impl ChatPrompt {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A text-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, prompt: ChatPrompt) -> Result<String, LlmError>;
}

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
    Anthropic,
    OpenAi,
}

impl LlmBackend {
    /// Environment variable holding the API key for this backend.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LlmBackend::Gemini => "GEMINI_API_KEY",
            LlmBackend::Anthropic => "ANTHROPIC_API_KEY",
            LlmBackend::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::Gemini => "gemini-1.5-flash",
            LlmBackend::Anthropic => "claude-3-5-haiku-latest",
            LlmBackend::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LlmBackend::Gemini => "gemini",
            LlmBackend::Anthropic => "anthropic",
            LlmBackend::OpenAi => "openai",
        })
    }
}

impl FromStr for LlmBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmBackend::Gemini),
            "anthropic" | "claude" => Ok(LlmBackend::Anthropic),
            "openai" => Ok(LlmBackend::OpenAi),
            other => Err(ConfigError::InvalidValue {
                key: "GARDEN_LLM_BACKEND".to_string(),
                message: format!("unknown backend '{other}' (expected gemini, anthropic or openai)"),
            }),
        }
    }
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: SecretString,
    pub model: String,
}

impl LlmConfig {
    /// Read backend, model and key from the environment.
    ///
    /// A missing key is not an error here; requests fail at call time instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("GARDEN_LLM_BACKEND") {
            Some(value) => value.parse()?,
            None => LlmBackend::Gemini,
        };
        let model = lookup("GARDEN_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| backend.default_model().to_string());
        let api_key = lookup(backend.api_key_var()).unwrap_or_default();

        Ok(Self {
            backend,
            api_key: SecretString::from(api_key),
            model,
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    use rig::providers::{anthropic, gemini, openai};

    let key = config.api_key.expose_secret();
    let provider = match config.backend {
        LlmBackend::Gemini => wrap_client::<gemini::Client>(config, gemini::Client::new(key))?,
        LlmBackend::Anthropic => {
            wrap_client::<anthropic::Client>(config, anthropic::Client::new(key))?
        }
        LlmBackend::OpenAi => wrap_client::<openai::Client>(config, openai::Client::new(key))?,
    };
    tracing::info!(backend = %config.backend, model = %config.model, "LLM provider ready");
    Ok(provider)
}

/// Turn a freshly built rig client into a provider for the configured model.
fn wrap_client<C>(
    config: &LlmConfig,
    client: rig::http_client::Result<C>,
) -> Result<Arc<dyn LlmProvider>, LlmError>
where
    C: CompletionClient,
    C::CompletionModel: Clone + Send + Sync + 'static,
{
    let client = client.map_err(|e| LlmError::RequestFailed {
        provider: config.backend.to_string(),
        reason: format!("client setup failed: {e}"),
    })?;
    let model = client.completion_model(config.model.as_str());
    Ok(Arc::new(RigAdapter::new(model, &config.model, config.backend)))
}
