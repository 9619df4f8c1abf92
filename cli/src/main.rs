//! Content Rules CLI
//!
//! Evaluates content rules against a fixture catalog from the command line.
//!
//! # Usage
//!
//! ```bash
//! content-rules match --fixture store.json --item 12
//! content-rules match --fixture store.json --item 12 --rule 3
//! content-rules render --fixture store.yaml --item 12 --at 2024-03-15T00:00:00Z
//! content-rules rules --fixture store.json --format yaml
//! content-rules config set decimals 3
//! ```

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod fixture;
mod output;

#[derive(Parser)]
#[command(name = "content-rules")]
#[command(version)]
#[command(about = "Content rules command line interface", long_about = None)]
struct Cli {
    /// Currency decimal precision
    #[arg(long, env = "CONTENT_RULES_DECIMALS")]
    decimals: Option<u32>,

    /// Evaluation time (RFC 3339), defaults to now
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check which rules apply to an item
    Match {
        /// Fixture file (JSON or YAML)
        #[arg(long)]
        fixture: String,
        /// Item id
        #[arg(long)]
        item: u64,
        /// Check a single rule instead of listing all matching rules
        #[arg(long)]
        rule: Option<u64>,
    },
    /// Show an item with matching rule actions applied
    Render {
        /// Fixture file (JSON or YAML)
        #[arg(long)]
        fixture: String,
        /// Item id
        #[arg(long)]
        item: u64,
    },
    /// List the rule book of a fixture
    Rules {
        /// Fixture file (JSON or YAML)
        #[arg(long)]
        fixture: String,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = config::Config::load(cli.profile.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Config not readable, using defaults");
        config::Config::default()
    });
    let settings = config.engine_settings(cli.decimals);
    let format = cli.format.unwrap_or_else(|| config.output_format());
    let now = cli.at.unwrap_or_else(Utc::now);

    let result = match cli.command {
        Commands::Match { fixture, item, rule } => {
            commands::evaluate::matching(&fixture, settings, item, rule, now, format)
        }
        Commands::Render { fixture, item } => {
            commands::evaluate::render(&fixture, settings, item, now, format)
        }
        Commands::Rules { fixture } => commands::rules::list(&fixture, now, format),
        Commands::Config { action } => commands::config::handle(action, cli.profile.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
