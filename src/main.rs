//! commitgen - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commitgen::config::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationSettings,
    load_template, resolve_base_url, resolve_model,
};
use commitgen::git::{GitRepository, VcsGateway};
use commitgen::llm::{InferenceProvider, ProviderConfig, ProviderKind, create_provider};
use commitgen::CommitMessageGenerator;

const SEPARATOR: &str = "--------------------------------------------------";

/// Generate a commit message for staged changes using a local LLM.
#[derive(Parser, Debug)]
#[command(name = "commitgen")]
#[command(about = "Generate a commit message for staged changes using a local LLM")]
#[command(version)]
struct Cli {
    /// Model to use (same as --model)
    #[arg(value_name = "MODEL")]
    positional_model: Option<String>,

    /// Model to use; overrides the positional argument
    #[arg(short, long)]
    model: Option<String>,

    /// Inference backend
    #[arg(short, long, value_enum, default_value_t = ProviderKind::Ollama)]
    provider: ProviderKind,

    /// Ollama base URL [env: COMMITGEN_OLLAMA_URL]
    #[arg(long)]
    ollama_url: Option<String>,

    /// LM Studio base URL [env: COMMITGEN_LM_STUDIO_URL]
    #[arg(long)]
    lm_studio_url: Option<String>,

    /// Maximum number of tokens to generate
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature (0 to 2)
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Commit message template with <short description> and <long description>
    #[arg(long)]
    template: Option<String>,

    /// Read the commit message template from a file
    #[arg(long)]
    template_file: Option<PathBuf>,

    /// Include recent commit messages of each staged file in the prompt
    #[arg(long)]
    history: bool,

    /// Number of recent commit messages per file
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Commit the staged changes with the generated message
    #[arg(short, long)]
    commit: bool,

    /// List the provider's models and exit
    #[arg(long)]
    list_models: bool,

    /// Print the prompt instead of calling the model
    #[arg(long)]
    show_prompt: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn base_url_flag(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::Ollama => self.ollama_url.as_deref(),
            ProviderKind::LmStudio => self.lm_studio_url.as_deref(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            if message.starts_with("Error:") {
                eprintln!("{message}");
            } else {
                eprintln!("Error: {message}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "commitgen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = GenerationSettings {
        max_tokens: cli.max_tokens,
        temperature: cli.temperature,
        template: load_template(cli.template.clone(), cli.template_file.as_deref())?,
        use_history: cli.history,
        history_limit: cli.history_limit,
    };
    settings.validate()?;

    let base_url = resolve_base_url(cli.provider, cli.base_url_flag());
    let model = resolve_model(cli.positional_model.clone(), cli.model.clone());

    if cli.list_models {
        let provider = create_provider(ProviderConfig::new(cli.provider, &base_url, ""))?;
        return Ok(print_models(provider.as_ref(), false).await);
    }

    if cli.show_prompt {
        let repo = open_repository()?;
        let generator = CommitMessageGenerator::new(&repo, settings);
        println!("{}", generator.build_prompt()?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(model) = model else {
        let provider = create_provider(ProviderConfig::new(cli.provider, &base_url, ""))?;
        print_models(provider.as_ref(), true).await;
        return Ok(ExitCode::FAILURE);
    };

    let repo = open_repository()?;
    let provider = create_provider(ProviderConfig::new(cli.provider, &base_url, &model))?;
    let generator = CommitMessageGenerator::new(&repo, settings).with_provider(provider);

    println!("Generating commit message with {} ({model})...", cli.provider);
    let message = generator.generate().await?;

    println!("\nGenerated commit message:");
    println!("{SEPARATOR}");
    println!("{message}");
    println!("{SEPARATOR}");

    if cli.commit {
        let oid = repo.commit(&message).context("Failed to commit staged changes")?;
        println!("\n✓ Committed {}", short_id(&oid.to_string()));
    } else {
        println!("\nTo commit with this message, run:");
        println!("git commit -m \"{}\"", escape_double_quotes(&message));
    }

    Ok(ExitCode::SUCCESS)
}

fn open_repository() -> Result<GitRepository> {
    GitRepository::discover(".")
        .context("Not a git repository. Run commitgen from within a git repository.")
}

/// Print the provider's models, or a hint that the server could not be reached.
///
/// Returns the exit code for a `--list-models` run.
async fn print_models(provider: &dyn InferenceProvider, ask_for_model: bool) -> ExitCode {
    let kind = provider.kind();
    let models = provider.list_models().await;

    if models.is_empty() {
        eprintln!(
            "Failed to retrieve models for {kind}. Please check if the service is running."
        );
        return ExitCode::FAILURE;
    }

    println!("Available models for {kind}:");
    for model in &models {
        println!("- {model}");
    }
    if ask_for_model {
        println!("\nPlease specify a model with --model parameter.");
    }
    ExitCode::SUCCESS
}

fn escape_double_quotes(message: &str) -> String {
    message.replace('"', "\\\"")
}

fn short_id(id: &str) -> &str {
    &id[..id.len().min(7)]
}
