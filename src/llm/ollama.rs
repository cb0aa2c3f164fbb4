//! Ollama-style local generation server.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::ProviderError;
use crate::llm::provider::{
    GenerationRequest, GenerationResult, InferenceProvider, ProviderConfig, ProviderKind,
    endpoint, http_client,
};

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsReply {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: Option<String>,
}

/// Client for `POST /api/generate` and `GET /api/tags`.
pub struct OllamaProvider {
    config: ProviderConfig,
    client: Client,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = http_client(ProviderKind::Ollama)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn request_generation(&self, request: &GenerationRequest) -> Result<String, reqwest::Error> {
        let body = GenerateBody {
            model: &self.config.model,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let reply: GenerateReply = self
            .client
            .post(endpoint(&self.config.base_url, "api/generate"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(reply.response)
    }

    async fn request_models(&self) -> Result<Vec<String>, reqwest::Error> {
        let reply: TagsReply = self
            .client
            .get(endpoint(&self.config.base_url, "api/tags"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(reply.models.into_iter().filter_map(|m| m.name).collect())
    }
}

#[async_trait]
impl InferenceProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        debug!(
            model = %self.config.model,
            prompt_chars = request.prompt.len(),
            "Requesting generation from Ollama"
        );

        self.request_generation(request).await.map_err(|source| {
            error!("Error with Ollama API: {source}");
            ProviderError::Request {
                provider: ProviderKind::Ollama,
                source,
            }
        })
    }

    async fn list_models(&self) -> Vec<String> {
        match self.request_models().await {
            Ok(models) => models,
            Err(e) => {
                error!("Error fetching Ollama models: {e}");
                Vec::new()
            }
        }
    }
}
