// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blankfill - fill-in-the-blank NLP request service.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use blankfill_config::model::BlankfillConfig;
use blankfill_core::{BlankfillError, NewRequest};
use blankfill_gateway::JwtFactory;
use blankfill_inference::FillInPipeline;
use blankfill_storage::Database;

/// Blankfill - fill-in-the-blank NLP request service.
#[derive(Parser, Debug)]
#[command(name = "blankfill", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP service.
    Serve,
    /// Create or upgrade the database schema and exit.
    Migrate,
    /// Mint a bearer token signed with `auth.jwt_secret`.
    Token {
        /// Extra claim as KEY=VALUE. Registered claim names are ignored.
        #[arg(long = "claim", value_parser = parse_claim)]
        claims: Vec<(String, String)>,
        /// Lifetime in seconds, overriding `auth.token_duration_secs`.
        #[arg(long)]
        duration: Option<u64>,
    },
    /// Run the inference pipeline once and print the accepted completions.
    Predict {
        /// Sentence containing a `<blank>` placeholder.
        sentence: String,
    },
    /// Print the effective configuration.
    Config,
}

fn parse_claim(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => blankfill_config::load_and_validate_path(path),
        None => blankfill_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            blankfill_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Migrate) => run_migrate(&config).await,
        Some(Commands::Token { claims, duration }) => run_token(&config, claims, duration),
        Some(Commands::Predict { sentence }) => run_predict(&config, sentence).await,
        Some(Commands::Config) => run_config(&config),
        None => {
            println!("blankfill: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// `blankfill migrate`: apply the embedded schema migrations.
async fn run_migrate(config: &BlankfillConfig) -> Result<(), BlankfillError> {
    serve::init_tracing(&config.service.log_level);
    let path = &config.storage.database_path;
    let db = Database::open_with(path, config.storage.wal_mode).await?;
    db.close().await?;
    info!(path = %path, "database schema is up to date");
    println!("migrated {path}");
    Ok(())
}

/// `blankfill token`: print a signed bearer token.
fn run_token(
    config: &BlankfillConfig,
    claims: Vec<(String, String)>,
    duration: Option<u64>,
) -> Result<(), BlankfillError> {
    let secret = config
        .auth
        .jwt_secret
        .as_deref()
        .ok_or_else(|| BlankfillError::Config("auth.jwt_secret is not set".into()))?;
    let factory = JwtFactory::new(
        secret,
        duration.unwrap_or(config.auth.token_duration_secs),
    );

    let extra: serde_json::Map<String, serde_json::Value> = claims
        .into_iter()
        .map(|(key, value)| (key, serde_json::Value::String(value)))
        .collect();
    let token = factory
        .create_token(&extra)
        .map_err(|e| BlankfillError::Internal(e.to_string()))?;
    println!("{token}");
    Ok(())
}

/// `blankfill predict`: validate a sentence and print its completions.
async fn run_predict(config: &BlankfillConfig, sentence: String) -> Result<(), BlankfillError> {
    serve::init_tracing(&config.service.log_level);
    NewRequest::new(sentence.as_str(), "cli").validate()?;

    let pipeline = FillInPipeline::from_config(&config.inference).await?;
    let completions = tokio::task::spawn_blocking(move || pipeline.run(&sentence))
        .await
        .map_err(|e| BlankfillError::Internal(format!("inference task failed: {e}")))??;

    if completions.is_empty() {
        println!("(no positive completions)");
    }
    for word in completions {
        println!("{word}");
    }
    Ok(())
}

/// `blankfill config`: print the effective configuration as TOML.
fn run_config(config: &BlankfillConfig) -> Result<(), BlankfillError> {
    let rendered = blankfill_config::effective_toml(config)
        .map_err(|e| BlankfillError::Config(e.to_string()))?;
    print!("{rendered}");
    Ok(())
}
