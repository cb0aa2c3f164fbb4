//! Commit message generation: diff, prompt, provider call, cleanup.

use tracing::{debug, info_span, warn};

use crate::commit::diff::collect_diff_context;
use crate::commit::history::collect_history;
use crate::commit::prompt::build_commit_prompt;
use crate::commit::sanitize::sanitize_response;
use crate::config::GenerationSettings;
use crate::error::GenerateError;
use crate::git::VcsGateway;
use crate::llm::{GenerationRequest, InferenceProvider};

/// Single-pass pipeline from staged changes to a cleaned commit message.
///
/// The provider is chosen once at construction and never swapped. Without a
/// provider, [`generate`](Self::generate) fails before any network call.
pub struct CommitMessageGenerator<'a> {
    vcs: &'a dyn VcsGateway,
    provider: Option<Box<dyn InferenceProvider>>,
    settings: GenerationSettings,
}

impl<'a> CommitMessageGenerator<'a> {
    pub fn new(vcs: &'a dyn VcsGateway, settings: GenerationSettings) -> Self {
        Self {
            vcs,
            provider: None,
            settings,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn InferenceProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Collect the staged diff (and history, if enabled) and render the prompt.
    pub fn build_prompt(&self) -> Result<String, GenerateError> {
        let _span = info_span!("build_prompt").entered();

        let staged = self.vcs.list_staged_files()?;
        if staged.is_empty() {
            return Err(GenerateError::NoStagedChanges);
        }
        debug!("Found {} staged files", staged.len());

        let diff = collect_diff_context(self.vcs, &staged)?;

        let history = if self.settings.use_history {
            Some(collect_history(
                self.vcs,
                &diff.considered_paths(),
                self.settings.history_limit,
            ))
        } else {
            None
        };

        let prompt = build_commit_prompt(&diff, self.settings.template.as_deref(), history.as_ref())?;
        debug!("Commit prompt length: {} chars", prompt.len());
        Ok(prompt)
    }

    /// Generate a commit message for the staged changes.
    pub async fn generate(&self) -> Result<String, GenerateError> {
        let prompt = self.build_prompt()?;

        let provider = self
            .provider
            .as_deref()
            .ok_or(GenerateError::NoProviderConfigured)?;

        let request = GenerationRequest {
            prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let raw = provider.generate(&request).await?;
        debug!("Raw model response: {} chars", raw.len());

        match sanitize_response(&raw) {
            Some(message) => Ok(message),
            None => {
                if !raw.is_empty() {
                    warn!("Model response was empty after cleanup. Raw response: {raw}");
                }
                Err(GenerateError::EmptyGeneration)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GitError, ProviderError};
    use crate::git::repository::MockVcsGateway;
    use crate::llm::ProviderKind;
    use crate::llm::provider::MockInferenceProvider;

    /// Staged files with their diffs, one diff line per text line.
    fn vcs_with_files(files: &[(&str, &str)]) -> MockVcsGateway {
        let paths: Vec<String> = files.iter().map(|(p, _)| p.to_string()).collect();
        let diffs: Vec<(String, Vec<String>)> = files
            .iter()
            .map(|(p, diff)| (p.to_string(), diff.lines().map(String::from).collect()))
            .collect();

        let mut vcs = MockVcsGateway::new();
        vcs.expect_list_staged_files()
            .returning(move || Ok(paths.clone()));
        vcs.expect_diff_for().returning(move |path| {
            Ok(diffs
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, lines)| lines.clone())
                .unwrap_or_default())
        });
        vcs
    }

    fn provider_returning(text: &'static str) -> Box<MockInferenceProvider> {
        let mut provider = MockInferenceProvider::new();
        provider
            .expect_generate()
            .times(1)
            .returning(move |_| Ok(text.to_string()));
        Box::new(provider)
    }

    fn transport_error() -> ProviderError {
        let source = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        ProviderError::Request {
            provider: ProviderKind::Ollama,
            source,
        }
    }

    #[tokio::test]
    async fn test_no_staged_changes_never_calls_provider() {
        let mut vcs = MockVcsGateway::new();
        vcs.expect_list_staged_files().returning(|| Ok(Vec::new()));
        vcs.expect_diff_for().never();

        let mut provider = MockInferenceProvider::new();
        provider.expect_generate().never();

        let generator = CommitMessageGenerator::new(&vcs, GenerationSettings::default())
            .with_provider(Box::new(provider));

        let result = generator.generate().await;
        assert!(matches!(result, Err(GenerateError::NoStagedChanges)));
    }

    #[tokio::test]
    async fn test_missing_provider_reported_after_prompt() {
        let vcs = vcs_with_files(&[("src/lib.rs", "+pub mod x;")]);
        let generator = CommitMessageGenerator::new(&vcs, GenerationSettings::default());

        let result = generator.generate().await;
        assert!(matches!(result, Err(GenerateError::NoProviderConfigured)));
    }

    #[tokio::test]
    async fn test_only_oversized_files_is_not_sent() {
        let huge: Vec<String> = (0..10_001).map(|i| format!("+{i}")).collect();
        let mut vcs = MockVcsGateway::new();
        vcs.expect_list_staged_files()
            .returning(|| Ok(vec!["dump.sql".to_string()]));
        vcs.expect_diff_for().returning(move |_| Ok(huge.clone()));

        let mut provider = MockInferenceProvider::new();
        provider.expect_generate().never();

        let generator = CommitMessageGenerator::new(&vcs, GenerationSettings::default())
            .with_provider(Box::new(provider));

        let result = generator.generate().await;
        assert!(matches!(result, Err(GenerateError::NoSuitableChanges)));
    }

    #[tokio::test]
    async fn test_success_returns_sanitized_message() {
        let vcs = vcs_with_files(&[("src/auth.rs", "+fn login() {}")]);
        let settings = GenerationSettings {
            max_tokens: 99,
            temperature: 0.25,
            ..Default::default()
        };

        let mut provider = MockInferenceProvider::new();
        provider
            .expect_generate()
            .withf(|request| {
                request.max_tokens == 99
                    && request.temperature == 0.25
                    && request.prompt.contains("+fn login() {}")
            })
            .times(1)
            .returning(|_| Ok("<think>it adds login</think>\n`feat: add login`".to_string()));

        let generator = CommitMessageGenerator::new(&vcs, settings).with_provider(Box::new(provider));

        assert_eq!(generator.generate().await.unwrap(), "feat: add login");
    }

    #[tokio::test]
    async fn test_reasoning_only_response_is_empty_generation() {
        let vcs = vcs_with_files(&[("a.rs", "+x")]);
        let generator = CommitMessageGenerator::new(&vcs, GenerationSettings::default())
            .with_provider(provider_returning("<think>hmm</think>"));

        let result = generator.generate().await;
        assert!(matches!(result, Err(GenerateError::EmptyGeneration)));
    }

    #[tokio::test]
    async fn test_provider_error_is_distinct_from_empty_generation() {
        let vcs = vcs_with_files(&[("a.rs", "+x")]);
        let mut provider = MockInferenceProvider::new();
        provider
            .expect_generate()
            .times(1)
            .returning(|_| Err(transport_error()));

        let generator = CommitMessageGenerator::new(&vcs, GenerationSettings::default())
            .with_provider(Box::new(provider));

        match generator.generate().await {
            Err(GenerateError::ProviderTransport(e)) => {
                assert!(e.to_string().starts_with("Error: Could not generate with Ollama"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_vcs_failure_surfaces_as_vcs_error() {
        let mut vcs = MockVcsGateway::new();
        vcs.expect_list_staged_files().returning(|| {
            Err(GitError::StagedFilesFailed(git2::Error::from_str("index locked")))
        });

        let generator = CommitMessageGenerator::new(&vcs, GenerationSettings::default());
        let result = generator.generate().await;
        assert!(matches!(result, Err(GenerateError::Vcs(_))));
    }

    #[test]
    fn test_history_disabled_skips_lookup() {
        let mut vcs = vcs_with_files(&[("a.py", "+x")]);
        vcs.expect_recent_subjects().never();

        let generator = CommitMessageGenerator::new(&vcs, GenerationSettings::default());
        let prompt = generator.build_prompt().unwrap();
        assert!(!prompt.contains("Recent commit"));
    }

    #[test]
    fn test_history_failure_degrades_gracefully() {
        let mut vcs = vcs_with_files(&[("a.py", "+x"), ("b.py", "+y")]);
        vcs.expect_recent_subjects()
            .withf(|path, limit| path == "a.py" && *limit == 2)
            .returning(|_, _| Ok(vec!["fix bug".to_string(), "add feature".to_string()]));
        vcs.expect_recent_subjects()
            .withf(|path, _| path == "b.py")
            .returning(|_, _| {
                Err(GitError::LogFailed {
                    path: "b.py".to_string(),
                    source: git2::Error::from_str("bad object"),
                })
            });

        let settings = GenerationSettings {
            use_history: true,
            history_limit: 2,
            ..Default::default()
        };
        let generator = CommitMessageGenerator::new(&vcs, settings);

        let prompt = generator.build_prompt().unwrap();
        assert!(prompt.contains("Recent commit messages for a.py:\n  - fix bug\n  - add feature\n"));
        assert!(!prompt.contains("Recent commit messages for b.py"));
    }

    #[test]
    fn test_prompt_is_identical_across_runs() {
        let vcs = vcs_with_files(&[("a.rs", "+one\n-two"), ("b.rs", "+three")]);
        let generator = CommitMessageGenerator::new(&vcs, GenerationSettings::default());

        assert_eq!(generator.build_prompt().unwrap(), generator.build_prompt().unwrap());
    }
}
