//! CLI administration tool for shortlink.
//!
//! Runs maintenance operations against the database without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Delete expired links now instead of waiting for the next restart
//! cargo run --bin admin -- purge
//!
//! # View counter of a single link
//! cargo run --bin admin -- stats aZ3k9Q
//!
//! # Link totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database variables as the server (`DATABASE_URL` or `DB_*`).

use shortlink::AppError;
use shortlink::config;
use shortlink::domain::entities::utc_now;
use shortlink::server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// Delete all expired links
    Purge {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show link totals, or the view counter of one link
    Stats {
        /// Short token to inspect
        token: Option<String>,
    },

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

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = server::connect_pool(&config).await?;

    match cli.command {
        Commands::Purge { yes } => handle_purge(pool, config.token_length, yes).await?,
        Commands::Stats { token } => handle_stats(pool, config.token_length, token).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Deletes expired links after showing how many would be removed.
async fn handle_purge(pool: PgPool, token_length: usize, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge expired links".bright_blue().bold());
    println!();

    let expired: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM short_links WHERE expires_at IS NOT NULL AND expires_at <= $1",
    )
    .bind(utc_now())
    .fetch_one(&pool)
    .await?;

    if expired == 0 {
        println!("{}", "  Nothing to purge".green());
        return Ok(());
    }

    println!(
        "  Expired links: {}",
        expired.to_string().bright_yellow().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete these links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let service = server::build_service(Arc::new(pool), token_length);
    let purged = service
        .purge_expired()
        .await
        .context("Failed to purge expired links")?;

    println!();
    println!(
        "{} {}",
        "✅ Purged".green().bold(),
        format!("{} link(s)", purged).bright_white()
    );
    println!();

    Ok(())
}

/// Displays link totals, or a single link's view counter.
async fn handle_stats(pool: PgPool, token_length: usize, token: Option<String>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    if let Some(token) = token {
        let service = server::build_service(Arc::new(pool), token_length);

        match service.view_count(&token).await {
            Ok(count) => {
                println!("  Token: {}", token.cyan());
                println!("  Views: {}", count.to_string().bright_white().bold());
            }
            Err(AppError::NotFound { .. }) => {
                println!("  {} {}", "Not found:".yellow(), token.cyan());
            }
            Err(e) => return Err(e).context("Failed to read view count"),
        }

        println!();
        return Ok(());
    }

    let now = utc_now();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(&pool)
        .await?;

    let expired: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM short_links WHERE expires_at IS NOT NULL AND expires_at <= $1",
    )
    .bind(now)
    .fetch_one(&pool)
    .await?;

    let views: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(view_count), 0)::BIGINT FROM short_links")
            .fetch_one(&pool)
            .await?;

    println!("  Links:        {}", total.to_string().bright_white().bold());
    println!("  Active:       {}", (total - expired).to_string().green());
    println!("  Expired:      {}", expired.to_string().yellow());
    println!("  Total views:  {}", views.to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await
                .context("Database query failed")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  {}", version.bright_black());
        }
        DbAction::Migrate => {
            server::migrate(pool).await?;
            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    println!();

    Ok(())
}
