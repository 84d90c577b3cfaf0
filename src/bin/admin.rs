//! CLI administration tool for redislink.
//!
//! Runs engine operations and connectivity checks directly against the
//! configured record store and cache, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/a
//!
//! # Look up a code
//! cargo run --bin admin -- resolve abc123XY
//!
//! # Check the cache backend
//! cargo run --bin admin -- cache status
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same configuration as the server (`DATABASE_URL`, `REDIS_URL`,
//! `CACHE_BACKEND`, ...). `.env` is loaded if present.

use redislink::config::{self, Config, mask_connection_string};
use redislink::domain::repositories::UrlRepository;
use redislink::error::AppError;
use redislink::infrastructure::cache::{self, CacheService};
use redislink::infrastructure::persistence;
use redislink::server::build_engine;
use redislink::utils::code_generator::validate_code;
use redislink::utils::url_validator::validate_long_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;

/// CLI tool for managing redislink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Create (or fetch) the short link for a URL
    Shorten {
        /// Long URL to shorten
        url: String,
    },

    /// Print the long URL behind a short code
    Resolve {
        /// Short code to look up
        code: String,
    },

    /// Cache operations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Cache subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Connect and show connection status
    Status,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;

    match cli.command {
        Commands::Shorten { url } => handle_shorten(&config, &url).await?,
        Commands::Resolve { code } => handle_resolve(&config, &code).await?,
        Commands::Cache { action } => handle_cache_action(action, &config).await?,
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

/// Opens the store and a connected cache.
///
/// A cache that fails to connect is reported and used anyway; the engine
/// falls back to the store.
async fn open_backends(config: &Config) -> Result<(Arc<dyn UrlRepository>, Arc<dyn CacheService>)> {
    let repository = persistence::open(config)
        .await
        .context("Failed to open record store")?;
    let cache = cache::build(config)?;

    if !cache.connect().await {
        println!(
            "{}",
            "⚠️  Cache unavailable, using the record store only".yellow()
        );
    }

    Ok((repository, cache))
}

/// Runs `create_short_link` and prints the result.
async fn handle_shorten(config: &Config, url: &str) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    let long_url = validate_long_url(url, config.url_max_length)?;

    let (repository, cache) = open_backends(config).await?;
    let engine = build_engine(config, repository, cache.clone());

    let link = engine
        .create_short_link(&long_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("  Code:      {}", link.code.bright_green().bold());
    println!("  Short URL: {}", link.short_url.cyan());
    println!("  Long URL:  {}", link.long_url.bright_black());
    println!("  Status:    {}", link.status.message());
    println!();

    cache.disconnect().await;
    Ok(())
}

/// Runs `resolve_code` and prints the long URL.
async fn handle_resolve(config: &Config, code: &str) -> Result<()> {
    println!("{}", "🔍 Resolve code".bright_blue().bold());
    println!();

    validate_code(code).map_err(|e| anyhow::anyhow!("{}", e))?;

    let (repository, cache) = open_backends(config).await?;
    let engine = build_engine(config, repository, cache.clone());

    let result = engine.resolve_code(code).await;
    cache.disconnect().await;

    match result {
        Ok(long_url) => {
            println!("  {} → {}", code.bright_white(), long_url.cyan());
            println!();
            Ok(())
        }
        Err(AppError::NotFound { .. }) => {
            println!("{}", format!("❌ No short link for '{}'", code).red());
            println!();
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Failed to resolve code: {}", e)),
    }
}

/// Handles cache diagnostic commands.
async fn handle_cache_action(action: CacheAction, config: &Config) -> Result<()> {
    match action {
        CacheAction::Status => {
            println!("{}", "🔍 Checking cache...".bright_blue());
            println!();

            let cache = cache::build(config)?;
            cache.connect().await;
            let status = cache.status().await;

            if let Some(redis_url) = &config.redis_url {
                println!("  URL:         {}", mask_connection_string(redis_url));
            }
            println!("  Backend:     {}", status.backend.bright_white());

            let connected = if status.connected {
                "yes".green().bold()
            } else {
                "no".red().bold()
            };
            println!("  Connected:   {}", connected);
            println!(
                "  Retries:     {}/{}",
                status.retry_count, status.max_retries
            );
            println!();

            cache.disconnect().await;
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());
            println!("  {}", mask_connection_string(&config.database_url).bright_black());

            let repository = persistence::open(config)
                .await
                .context("Failed to open record store")?;
            repository
                .health_check()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
