//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod categories;
pub mod config;
pub mod favorites;
pub mod reverse;
pub mod search;
pub mod serve;

use crate::config::Config;
use crate::error::Result;
use crate::geo::Coordinates;
use crate::notify::{Notification, NotificationSink, Severity};
use crate::search::{Completion, LookupResult};
use crate::session::MapSession;
use crate::store::backend::FileStorage;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Search, pin and keep favorite places
#[derive(Parser)]
#[command(name = "geopin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a place by address or postal code
    Search(search::SearchArgs),

    /// Name the place at a coordinate pair
    Reverse(reverse::ReverseArgs),

    /// View and manage saved places
    Favorites(favorites::FavoritesArgs),

    /// List place categories
    Categories(categories::CategoriesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Notifications already reach the console; keep one-shot commands quiet.
    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    init_logging(default_level);

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Favorites(args) => favorites::run(args),
        Commands::Categories(args) => categories::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
    }
}

/// Install the log subscriber; `RUST_LOG` overrides `default_level`
pub fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Prints notifications to stderr, keeping stdout for results
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, n: Notification) {
        let tag = match n.severity {
            Severity::Info => "..",
            Severity::Success => "ok",
            Severity::Warning => "!!",
            Severity::Error => "error",
        };
        eprintln!("[{}] {}", tag, n.message);
    }
}

/// Open a session over the configured favorites file
pub(crate) fn open_session(config: &Config) -> Result<MapSession> {
    let storage = FileStorage::new(config.storage.data_dir()?);
    Ok(MapSession::open(Box::new(storage), config, Arc::new(ConsoleSink)))
}

/// Print the outcome of a lookup; true when a place was found
pub(crate) fn print_completion(completion: &Completion, json: bool) -> Result<bool> {
    let result = match completion {
        Completion::Applied { result } => result,
        // One lookup per command: nothing can supersede it.
        Completion::Stale => return Ok(false),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if let LookupResult::Found { at, name } = result {
        println!("{}", name);
        println!("  {}", format_coords(at));
    }

    Ok(matches!(result, LookupResult::Found { .. }))
}

pub(crate) fn format_coords(at: &Coordinates) -> String {
    format!("({:.6}, {:.6})", at.lat, at.lng)
}
