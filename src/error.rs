//! Error types for commitgen modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::ProviderKind;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to read the index: {0}")]
    IndexFailed(#[source] git2::Error),

    #[error("Failed to collect diff for '{path}': {source}")]
    DiffFailed {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to list staged files: {0}")]
    StagedFilesFailed(#[source] git2::Error),

    #[error("Failed to read commit history for '{path}': {source}")]
    LogFailed {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),
}

/// Errors from inference providers.
///
/// Every message starts with `Error:` so it can be shown to the user as-is.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Error: Could not generate with {provider}: {source}")]
    Request {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error: Could not create HTTP client for {provider}: {source}")]
    ClientBuild {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },
}

impl ProviderError {
    pub fn provider(&self) -> ProviderKind {
        match self {
            ProviderError::Request { provider, .. } => *provider,
            ProviderError::ClientBuild { provider, .. } => *provider,
        }
    }
}

/// Errors from settings validation and loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("max tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("temperature must be between 0 and 2, got {0}")]
    InvalidTemperature(f32),

    #[error("Failed to read template file {path:?}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from commit message generation.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("No staged changes found. Use 'git add' to stage changes first.")]
    NoStagedChanges,

    #[error(
        "No suitable staged changes: every staged file has an empty diff or is too large to describe"
    )]
    NoSuitableChanges,

    #[error("No model configured. Pass a model name or use --model to choose one.")]
    NoProviderConfigured,

    #[error(transparent)]
    ProviderTransport(#[from] ProviderError),

    #[error("The model returned an empty commit message. Try again or use a different model.")]
    EmptyGeneration,

    #[error("Git command failed: {0}")]
    Vcs(#[from] GitError),
}
