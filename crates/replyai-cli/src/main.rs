#![deny(unsafe_code)]

//! `replyai`: run the suggestion server or query providers from the shell.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use replyai_config::AppConfig;
use replyai_core::provider::NETWORK_PROVIDERS;
use replyai_core::{ProviderRegistry, Server, SuggestRequest};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// replyai: AI-powered reply suggestions.
#[derive(Debug, Parser)]
#[command(name = "replyai", version = replyai_core::build_info::VERSION, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "replyai.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the HTTP server.
    Serve,

    /// Generate suggestions for a message and print them as JSON.
    Suggest {
        /// The message to reply to.
        context: String,

        /// Provider id; defaults to `suggest.default_provider`.
        #[arg(short, long)]
        provider: Option<String>,

        /// Tone mode, repeatable (casual, formal, witty).
        #[arg(short, long = "mode")]
        modes: Vec<String>,

        /// Boldness, 0 to 10.
        #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
        intensity: i32,

        /// Caller identifier.
        #[arg(short, long, default_value = "cli")]
        user: String,
    },

    /// List providers and whether they are usable.
    Providers,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration (credentials omitted).
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, found) = load_config(&cli.config).await?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose, &config))),
        )
        .init();

    if !found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.command {
        Commands::Serve => cmd_serve(config).await?,
        Commands::Suggest {
            context,
            provider,
            modes,
            intensity,
            user,
        } => {
            let mut request = SuggestRequest::new(user, context).with_intensity(intensity);
            if !modes.is_empty() {
                request = request.with_modes(modes);
            }
            cmd_suggest(&config, provider.as_deref(), &request).await?
        }
        Commands::Providers => cmd_providers(&config),
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

/// Directive for the subscriber when `RUST_LOG` is unset.
fn log_filter(verbose: u8, config: &AppConfig) -> String {
    match verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

async fn cmd_serve(config: AppConfig) -> Result<()> {
    info!("Starting reply suggestion server");
    let server = Server::new(config);
    server.run().await.context("server failed")?;
    Ok(())
}

async fn cmd_suggest(
    config: &AppConfig,
    provider: Option<&str>,
    request: &SuggestRequest,
) -> Result<()> {
    if request.context.trim().is_empty() {
        anyhow::bail!("Empty context");
    }

    let registry = ProviderRegistry::from_config(config);
    let id = provider.unwrap_or(&config.suggest.default_provider);
    let provider = registry.resolve(id);
    info!(provider = %provider.id(), "Generating suggestions");

    let response = provider
        .generate(request)
        .await
        .with_context(|| format!("provider {} failed", provider.id()))?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn cmd_providers(config: &AppConfig) {
    let registry = ProviderRegistry::from_config(config);
    for line in provider_table(&registry, &config.suggest.default_provider) {
        println!("{line}");
    }
}

/// One row per known provider: id, display name, status.
fn provider_table(registry: &ProviderRegistry, default_provider: &str) -> Vec<String> {
    let mut ids: Vec<&str> = registry.ids();
    for id in NETWORK_PROVIDERS {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids.sort_unstable();

    let mut rows = vec![format!("{:<12} {:<22} {}", "ID", "NAME", "STATUS")];
    for id in ids {
        let (name, status) = match registry.get(id) {
            Some(p) if p.is_available() => (p.name().to_string(), "available"),
            Some(p) => (p.name().to_string(), "unavailable"),
            None => ("-".to_string(), "not configured"),
        };
        let marker = if id == default_provider { " (default)" } else { "" };
        rows.push(format!("{id:<12} {name:<22} {status}{marker}"));
    }
    rows
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str = toml::to_string_pretty(config).context("failed to render config")?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Load the config file (or defaults when absent) and apply environment
/// overrides. Returns whether the file existed.
async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    let found = path.exists();
    let mut config = if found {
        AppConfig::load(path)
            .await
            .with_context(|| format!("failed to load {}", path.display()))?
    } else {
        AppConfig::default()
    };
    config
        .apply_env_overrides(|key| std::env::var(key).ok())
        .context("invalid environment override")?;
    Ok((config, found))
}
