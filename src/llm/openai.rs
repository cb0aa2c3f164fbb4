//! OpenAI-compatible completion server (LM Studio and friends).

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
struct CompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionReply {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    text: String,
}

impl CompletionReply {
    /// Text of the first choice, or an empty string when there is none.
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ModelsReply {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: Option<String>,
}

/// Client for `POST /completions` and `GET /models`.
pub struct OpenAiCompatProvider {
    config: ProviderConfig,
    client: Client,
}

impl OpenAiCompatProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = http_client(ProviderKind::LmStudio)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn request_completion(&self, request: &GenerationRequest) -> Result<String, reqwest::Error> {
        let body = CompletionBody {
            model: &self.config.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        };

        let reply: CompletionReply = self
            .client
            .post(endpoint(&self.config.base_url, "completions"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(reply.into_text())
    }

    async fn request_models(&self) -> Result<Vec<String>, reqwest::Error> {
        let reply: ModelsReply = self
            .client
            .get(endpoint(&self.config.base_url, "models"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(reply.data.into_iter().filter_map(|m| m.id).collect())
    }
}

#[async_trait]
impl InferenceProvider for OpenAiCompatProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::LmStudio
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        debug!(
            model = %self.config.model,
            prompt_chars = request.prompt.len(),
            "Requesting completion from OpenAI-compatible server"
        );

        self.request_completion(request).await.map_err(|source| {
            error!("Error with LM-Studio API: {source}");
            ProviderError::Request {
                provider: ProviderKind::LmStudio,
                source,
            }
        })
    }

    async fn list_models(&self) -> Vec<String> {
        match self.request_models().await {
            Ok(models) => models,
            Err(e) => {
                error!("Error fetching LM-Studio models: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_body_shape() {
        let body = CompletionBody {
            model: "qwen",
            prompt: "hi",
            max_tokens: 64,
            temperature: 0.25,
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "qwen",
                "prompt": "hi",
                "max_tokens": 64,
                "temperature": 0.25,
                "stream": false
            })
        );
    }

    #[test]
    fn test_first_choice_text_is_used() {
        let reply: CompletionReply =
            serde_json::from_str(r#"{"choices": [{"text": "feat: a"}, {"text": "feat: b"}]}"#)
                .unwrap();
        assert_eq!(reply.into_text(), "feat: a");
    }

    #[test]
    fn test_no_choices_yields_empty_text() {
        let reply: CompletionReply = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(reply.into_text(), "");

        let reply: CompletionReply = serde_json::from_str(r#"{"id": "cmpl-1"}"#).unwrap();
        assert_eq!(reply.into_text(), "");
    }
}
