//! Inference providers for local LLM servers.

pub mod ollama;
pub mod openai;
pub mod provider;

pub use ollama::OllamaProvider;
pub use openai::OpenAiCompatProvider;
pub use provider::{
    DEFAULT_LM_STUDIO_URL, DEFAULT_OLLAMA_URL, GenerationRequest, GenerationResult,
    InferenceProvider, ProviderConfig, ProviderKind, create_provider,
};
