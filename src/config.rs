//! Generation settings and endpoint resolution.

use std::env;
use std::path::Path;

use tracing::warn;

use crate::error::ConfigError;
use crate::llm::ProviderKind;

/// Default completion length budget.
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default number of past subjects fetched per file.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Environment variable overriding the Ollama base URL.
pub const OLLAMA_URL_ENV_VAR: &str = "COMMITGEN_OLLAMA_URL";

/// Environment variable overriding the LM Studio base URL.
pub const LM_STUDIO_URL_ENV_VAR: &str = "COMMITGEN_LM_STUDIO_URL";

/// Knobs for one generation run. Read-only once the generator is built.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Free-form template with `<short description>` / `<long description>` markers.
    pub template: Option<String>,
    pub use_history: bool,
    pub history_limit: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            template: None,
            use_history: false,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens);
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        Ok(())
    }
}

fn url_env_var(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Ollama => OLLAMA_URL_ENV_VAR,
        ProviderKind::LmStudio => LM_STUDIO_URL_ENV_VAR,
    }
}

/// Resolve the base URL for `kind`.
///
/// An explicit flag wins, then a non-empty environment override, then the
/// provider's default.
pub fn resolve_base_url(kind: ProviderKind, flag: Option<&str>) -> String {
    if let Some(url) = flag {
        return url.to_string();
    }

    match env::var(url_env_var(kind)) {
        Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => kind.default_base_url().to_string(),
    }
}

/// Pick the model from the positional argument and the `--model` flag.
///
/// The flag wins. Disagreeing values are logged so the override is visible.
pub fn resolve_model(positional: Option<String>, flag: Option<String>) -> Option<String> {
    match (positional, flag) {
        (Some(positional), Some(flag)) => {
            if positional != flag {
                warn!(
                    "Both a positional model '{positional}' and --model '{flag}' were given; using '{flag}'"
                );
            }
            Some(flag)
        }
        (positional, flag) => flag.or(positional),
    }
}

/// Load the commit template from an inline string or a file.
///
/// The file wins when both are given.
pub fn load_template(inline: Option<String>, file: Option<&Path>) -> Result<Option<String>, ConfigError> {
    let Some(path) = file else {
        return Ok(inline);
    };

    if inline.is_some() {
        warn!("Both --template and --template-file were given; using {}", path.display());
    }

    std::fs::read_to_string(path)
        .map(|content| Some(content.trim_end().to_string()))
        .map_err(|source| ConfigError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })
}
