//! commitgen - Generate commit messages for staged changes with a local LLM.
//!
//! # Overview
//!
//! commitgen reads the staged diff of a git repository, optionally adds the
//! recent commit subjects of each staged file, and asks a locally hosted model
//! (Ollama or an OpenAI-compatible server such as LM Studio) to write the
//! commit message. The reply is cleaned of reasoning markers before it is
//! shown or committed.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;

// Re-export commonly used types
pub use commit::CommitMessageGenerator;
pub use config::GenerationSettings;
pub use error::{ConfigError, GenerateError, GitError, ProviderError};
pub use git::{GitRepository, VcsGateway};
pub use llm::{GenerationRequest, InferenceProvider, ProviderConfig, ProviderKind, create_provider};
