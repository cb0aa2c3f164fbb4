//! Provider selection and the shared inference contract.

use std::fmt;

use async_trait::async_trait;
use clap::ValueEnum;
use reqwest::Client;

use crate::error::ProviderError;
use crate::llm::ollama::OllamaProvider;
use crate::llm::openai::OpenAiCompatProvider;

/// Default base URL of a local Ollama server.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default base URL of a local LM Studio server.
pub const DEFAULT_LM_STUDIO_URL: &str = "http://localhost:1234/v1";

/// Supported inference backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Local generation server speaking the Ollama API.
    #[value(name = "ollama")]
    Ollama,
    /// LM Studio, or any server exposing OpenAI-compatible completions.
    #[value(name = "lm-studio")]
    LmStudio,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "Ollama",
            ProviderKind::LmStudio => "LM-Studio",
        }
    }

    /// Name used on the command line.
    pub fn cli_name(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => "ollama",
            ProviderKind::LmStudio => "lm-studio",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Ollama => DEFAULT_OLLAMA_URL,
            ProviderKind::LmStudio => DEFAULT_LM_STUDIO_URL,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which backend to talk to, where, and with which model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Generated text, or the provider failure that prevented it.
pub type GenerationResult = Result<String, ProviderError>;

/// Contract shared by every inference backend.
///
/// Transport and HTTP-status failures are returned as [`ProviderError`] values,
/// never panics. Model listing swallows failures and yields an empty list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Complete `request.prompt` and return the raw model text.
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult;

    /// Models the server reports, or an empty list if it could not be asked.
    async fn list_models(&self) -> Vec<String>;
}

/// Build the provider for `config.kind`.
pub fn create_provider(config: ProviderConfig) -> Result<Box<dyn InferenceProvider>, ProviderError> {
    match config.kind {
        ProviderKind::Ollama => Ok(Box::new(OllamaProvider::new(config)?)),
        ProviderKind::LmStudio => Ok(Box::new(OpenAiCompatProvider::new(config)?)),
    }
}

/// Join a base URL and an API path, tolerating a trailing slash on the base.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub(crate) fn http_client(provider: ProviderKind) -> Result<Client, ProviderError> {
    Client::builder()
        .build()
        .map_err(|source| ProviderError::ClientBuild { provider, source })
}
