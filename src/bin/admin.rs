//! Operator CLI for shortlink.
//!
//! API callers authenticate with Bearer tokens issued here. The server only
//! ever sees HMAC digests, so `TOKEN_SIGNING_SECRET` must match between the
//! two.
//!
//! ```bash
//! admin token create --name CI --owner alice
//! admin token create --name Ops --owner ops --admin -y
//! admin token list
//! admin token revoke CI
//! admin stats
//! admin db check
//! admin db info
//! ```
//!
//! Reads `DATABASE_URL` (and `.env` when present).

use shortlink::application::services::hash_token;
use shortlink::domain::repositories::{ApiToken, NewApiToken, TokenRepository};
use shortlink::infrastructure::persistence::PgTokenRepository;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use rand::Rng;
use sqlx::PgPool;
use std::sync::Arc;

const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const GENERATED_TOKEN_LEN: usize = 48;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Parser)]
#[command(name = "admin", version, about = "Manage shortlink tokens and inspect its database")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue, list and revoke API tokens
    #[command(subcommand)]
    Token(TokenCommand),
    /// Totals for links, clicks and tokens
    Stats,
    /// Database connectivity
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Issue a token; the raw value is printed once
    Create(CreateToken),
    /// Show every token, revoked ones included
    List,
    /// Stop a token from authenticating
    Revoke {
        /// Numeric id or exact name
        token: String,
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Args)]
struct CreateToken {
    /// Label shown in `token list`
    #[arg(short, long)]
    name: Option<String>,
    /// Owner id the token acts as
    #[arg(short, long)]
    owner: Option<String>,
    /// May read and modify links of every owner
    #[arg(long)]
    admin: bool,
    /// Use this value instead of a generated one
    #[arg(long)]
    value: Option<String>,
    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Subcommand)]
enum DbCommand {
    /// Run a trivial query
    Check,
    /// Server version and applied migrations
    Info,
}

/// Connection shared by every command.
struct Admin {
    pool: PgPool,
    tokens: PgTokenRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let admin = Admin {
        tokens: PgTokenRepository::new(Arc::new(pool.clone())),
        pool,
    };

    match cli.command {
        Command::Token(TokenCommand::Create(args)) => admin.create_token(args).await,
        Command::Token(TokenCommand::List) => admin.list_tokens().await,
        Command::Token(TokenCommand::Revoke { token, yes }) => admin.revoke_token(&token, yes).await,
        Command::Stats => admin.stats().await,
        Command::Db(DbCommand::Check) => admin.db_check().await,
        Command::Db(DbCommand::Info) => admin.db_info().await,
    }
}

impl Admin {
    async fn create_token(&self, args: CreateToken) -> Result<()> {
        let secret =
            std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

        heading("Issue API token");

        let name = prompt_unless(args.name, "Token name")?;
        let owner_id = prompt_unless(args.owner, "Owner id")?;
        let raw = args.value.unwrap_or_else(generate_token);

        field("Name", name.cyan());
        field("Owner", owner_id.cyan());
        field("Role", role_label(args.admin));
        println!();

        if !args.yes && !confirm("Issue this token?", true)? {
            println!("{}", "Aborted".red());
            return Ok(());
        }

        let token_hash =
            hash_token(&secret, &raw).map_err(|e| anyhow!("Could not hash token: {e}"))?;
        let token = self
            .tokens
            .create_token(NewApiToken {
                name,
                owner_id,
                is_admin: args.admin,
                token_hash,
            })
            .await
            .map_err(|e| anyhow!("Could not store token: {e}"))?;

        println!(
            "{} token #{} issued. It will not be shown again:",
            "OK".green().bold(),
            token.id
        );
        println!();
        println!("  Authorization: Bearer {}", raw.bright_yellow().bold());
        println!();

        Ok(())
    }

    async fn list_tokens(&self) -> Result<()> {
        let tokens = self
            .tokens
            .list_tokens()
            .await
            .map_err(|e| anyhow!("Could not list tokens: {e}"))?;

        heading("API tokens");

        if tokens.is_empty() {
            println!("  {}", "none issued yet, see `admin token create`".yellow());
            return Ok(());
        }

        println!(
            "  {:<5} {:<22} {:<16} {:<6} {:<17} {:<17} STATE",
            "ID", "NAME", "OWNER", "ROLE", "CREATED", "LAST USED"
        );
        for token in &tokens {
            print_token_row(token);
        }

        let active = tokens.iter().filter(|t| !t.is_revoked()).count();
        println!();
        println!("  {} active of {}", active, tokens.len());

        Ok(())
    }

    /// Numeric input is looked up by id, anything else by exact name.
    async fn revoke_token(&self, token: &str, skip_confirm: bool) -> Result<()> {
        let found = match token.parse::<i64>() {
            Ok(id) => self.tokens.find_by_id(id).await,
            Err(_) => self.tokens.find_by_name(token).await,
        }
        .map_err(|e| anyhow!("Could not look up token: {e}"))?
        .with_context(|| format!("No token matches '{token}'"))?;

        if found.is_revoked() {
            println!("Token '{}' is already revoked", found.name.yellow());
            return Ok(());
        }

        heading("Revoke API token");
        field("Name", found.name.cyan());
        field("Owner", found.owner_id.cyan());
        field("Role", role_label(found.is_admin));
        println!();

        if !skip_confirm && !confirm("Revoke it?", false)? {
            println!("{}", "Aborted".red());
            return Ok(());
        }

        self.tokens
            .revoke_token(found.id)
            .await
            .map_err(|e| anyhow!("Could not revoke token: {e}"))?;

        println!("{} token #{} revoked", "OK".green().bold(), found.id);
        Ok(())
    }

    async fn stats(&self) -> Result<()> {
        let (links, redirectable, clicks, tokens): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM links),
                (SELECT COUNT(*) FROM links
                    WHERE is_enabled AND (expires_at IS NULL OR expires_at > NOW())),
                (SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM link_click_daily),
                (SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Could not read totals")?;

        heading("Totals");
        field("Links", links.to_string().bright_green());
        field("Redirectable", redirectable.to_string().bright_green());
        field("Clicks", clicks.to_string().bright_green());
        field("Active tokens", tokens.to_string().bright_green());

        Ok(())
    }

    async fn db_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database did not answer")?;

        println!("{} database reachable", "OK".green().bold());
        Ok(())
    }

    async fn db_info(&self) -> Result<()> {
        let version: String = sqlx::query_scalar("SELECT version()")
            .fetch_one(&self.pool)
            .await?;
        // Absent until the server has run once.
        let migrations: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
                .fetch_one(&self.pool)
                .await
                .ok();

        heading("Database");
        field("Server", version.normal());
        field(
            "Migrations",
            migrations
                .map(|n| n.to_string().normal())
                .unwrap_or_else(|| "not applied".yellow()),
        );

        Ok(())
    }
}

fn print_token_row(token: &ApiToken) {
    let last_used = token
        .last_used_at
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());
    let state = if token.is_revoked() {
        "revoked".red()
    } else {
        "active".green()
    };

    println!(
        "  {:<5} {:<22} {:<16} {:<6} {:<17} {:<17} {}",
        token.id,
        token.name,
        token.owner_id,
        if token.is_admin { "admin" } else { "user" },
        token.created_at.format(TIMESTAMP_FORMAT).to_string(),
        last_used,
        state
    );
}

fn heading(title: &str) {
    println!("{}", title.bright_blue().bold());
}

fn field(label: &str, value: ColoredString) {
    println!("  {:<14} {}", format!("{label}:"), value);
}

fn role_label(is_admin: bool) -> ColoredString {
    if is_admin {
        "admin".red().bold()
    } else {
        "user".normal()
    }
}

fn prompt_unless(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..GENERATED_TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}
