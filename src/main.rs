//! expertchat - Ask a hosted LLM questions through an expert persona
//!
//! Interactive REPL by default, plus one-shot and inspection subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use expertchat::{
    chat::OpenAiProvider,
    config::{self, mask_api_key, AppConfig},
    frontend::{print_personas, render, Outcome, Repl, Session},
    PersonaKey, ResponseGenerator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "expertchat")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Ask a hosted LLM questions through an expert persona")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "EXPERTCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Secrets file holding the API key
    #[arg(long, env = "EXPERTCHAT_SECRETS")]
    secrets: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive chat (default)
    Chat {
        /// Persona to start with (id or label)
        #[arg(short, long)]
        persona: Option<PersonaKey>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// Persona to answer as (id or label)
        #[arg(short, long)]
        persona: Option<PersonaKey>,

        /// Question text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List the available personas
    Personas,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },

    /// Check configuration and credentials without calling the provider
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr so answers on stdout stay clean
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("expertchat={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    let secrets = cli.secrets.unwrap_or_else(config::default_secrets_path);

    match cli.command.unwrap_or(Commands::Chat { persona: None }) {
        Commands::Chat { persona } => {
            run_chat(&config, &secrets, persona).await?;
        }
        Commands::Ask { persona, text } => {
            run_ask(&config, &secrets, persona, &text.join(" ")).await?;
        }
        Commands::Personas => {
            print_personas(&mut std::io::stdout(), config.ui.default_persona)?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
        Commands::Doctor => {
            run_doctor(cli.config.as_deref(), &config, &secrets);
        }
    }

    Ok(())
}

/// Resolve the credential and build the generator.
///
/// A missing credential stops the process here, before any input is read.
fn build_generator(config: &AppConfig, secrets: &Path) -> Result<ResponseGenerator> {
    let api_key = config.provider.resolve_api_key(secrets)?;
    let provider = OpenAiProvider::new(&config.provider, api_key)?;
    tracing::info!(
        "Using model {} at {}",
        provider.model(),
        config.provider.base_url
    );
    Ok(ResponseGenerator::new(Arc::new(provider)))
}

async fn run_chat(config: &AppConfig, secrets: &Path, persona: Option<PersonaKey>) -> Result<()> {
    let generator = build_generator(config, secrets)?;
    let persona = persona.unwrap_or(config.ui.default_persona);
    let history = config.ui.save_history.then(config::history_path);

    let mut repl = Repl::new(Session::new(generator, persona), history)?;
    repl.run().await?;
    Ok(())
}

async fn run_ask(
    config: &AppConfig,
    secrets: &Path,
    persona: Option<PersonaKey>,
    text: &str,
) -> Result<()> {
    let generator = build_generator(config, secrets)?;
    let persona = persona.unwrap_or(config.ui.default_persona);

    if let Some(reply) = generator.respond(text, persona).await? {
        render(&Outcome::Answer(reply), &mut std::io::stdout())?;
    }
    Ok(())
}

fn show_config(config: Option<&AppConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default().masked();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}

fn run_doctor(explicit: Option<&Path>, config: &AppConfig, secrets: &Path) {
    println!("expertchat doctor");
    println!();

    println!("Checking configuration...");
    let path = explicit.map(Path::to_path_buf).unwrap_or_else(config::config_path);
    if path.exists() {
        println!("  ✓ Configuration file found: {}", path.display());
    } else {
        println!("  ℹ No configuration file found (using defaults)");
    }
    println!("  ℹ Model: {} at {}", config.provider.model, config.provider.base_url);
    println!("  ℹ Default persona: {}", config.ui.default_persona.id());

    println!();
    println!("Checking credentials...");
    match config.provider.resolve_api_key(secrets) {
        Ok(key) => println!("  ✓ API key resolved: {}", mask_api_key(&key)),
        Err(e) => println!("  ✗ {}", e),
    }

    println!();
    println!("Doctor check complete!");
}
