//! Manara CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run content API database migrations
//! manara-cli migrate
//!
//! # Seed an administrator row ahead of first login
//! manara-cli admin create -e editor@manara.media -n "News Desk"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Seed administrator rows
//!
//! Note that seeding is optional: any allow-listed email gets its row
//! created on first login. Seeding only matters when a display name should
//! exist before that.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "manara-cli")]
#[command(author, version, about = "Manara CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage administrators
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Seed an administrator row
    Create {
        /// Administrator email address (must also be on the server's
        /// allow-list to be able to log in)
        #[arg(short, long)]
        email: String,

        /// Administrator display name
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, name } => {
                commands::admin::create(&email, name.as_deref()).await?;
            }
        },
    }
    Ok(())
}
