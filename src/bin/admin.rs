//! CLI administration tool for shorturl.
//!
//! Registers and resolves URLs, shows statistics, and performs database
//! operations without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a URL (prompts when the URL is omitted)
//! cargo run --bin admin -- shorten https://www.example.com
//!
//! # Look up a reference
//! cargo run --bin admin -- resolve 1
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_HOST`, `DB_USER`, ...): PostgreSQL connection
//! - `DNS_TIMEOUT_MS` (optional): host lookup deadline for `shorten`

use shorturl::application::services::{ResolveError, ShortenError, ShorteningService};
use shorturl::application::validator::{TokioHostResolver, UrlValidator};
use shorturl::config::{Config, parse_env};
use shorturl::domain::repositories::UrlRepository;
use shorturl::infrastructure::persistence::PgUrlRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing shorturl.
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
    /// Register a URL, or show its existing reference
    Shorten {
        /// URL to register (prompted for when omitted)
        url: Option<String>,
    },

    /// Show the URL registered under a reference
    Resolve {
        /// Numeric reference
        reference: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Shorten { url } => handle_shorten(&pool, url).await?,
        Commands::Resolve { reference } => handle_resolve(&pool, &reference).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Wires the shortening service over the given pool.
fn build_service(pool: &PgPool) -> ShorteningService {
    let dns_timeout_ms = parse_env("DNS_TIMEOUT_MS", 5000);

    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));
    let validator = UrlValidator::new(
        Arc::new(TokioHostResolver),
        Duration::from_millis(dns_timeout_ms),
    );

    ShorteningService::new(repository, validator)
}

/// Registers a URL through the full validation and dedup flow.
async fn handle_shorten(pool: &PgPool, url: Option<String>) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    match build_service(pool).shorten(&url).await {
        Ok(record) => {
            println!("  URL:       {}", record.url.cyan());
            println!(
                "  Reference: {}",
                record.short_ref.to_string().bright_green().bold()
            );
            println!(
                "  Created:   {}",
                record
                    .created_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
            println!();
        }
        Err(ShortenError::InvalidUrl(reason)) => {
            anyhow::bail!("{} {}", "❌ Rejected:".red().bold(), reason);
        }
        Err(ShortenError::StorageFailure(e)) => {
            anyhow::bail!("Storage failure: {}", e);
        }
    }

    Ok(())
}

/// Resolves a reference to its URL.
async fn handle_resolve(pool: &PgPool, reference: &str) -> Result<()> {
    match build_service(pool).resolve_redirect(reference).await {
        Ok(url) => println!("  {} → {}", reference.bright_white().bold(), url.cyan()),
        Err(ResolveError::StorageFailure(e)) => anyhow::bail!("Storage failure: {}", e),
        Err(e) => anyhow::bail!("{} {}", "⚠️ ".yellow(), e.to_string().yellow()),
    }

    Ok(())
}

/// Displays system statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let repository = PgUrlRepository::new(Arc::new(pool.clone()));
    let records = repository
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count records: {}", e))?;

    println!(
        "  Registered URLs: {}",
        records.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
