//! Favorites command handler
//!
//! View and manage saved places.

use crate::cli::{format_coords, open_session};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::MapSession;
use crate::store::PlaceId;
use clap::{Args, Subcommand};

/// Favorites command arguments
#[derive(Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub command: Option<FavoritesCommand>,

    /// Print as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Favorites subcommands
#[derive(Subcommand)]
pub enum FavoritesCommand {
    /// List saved places
    List,
    /// Show a saved place
    Show {
        /// Place ID (a unique prefix is enough)
        id: String,
    },
    /// Remove a saved place
    Remove {
        /// Place ID (a unique prefix is enough)
        id: String,
    },
    /// Print the camera directive for flying to a saved place
    Focus {
        /// Place ID (a unique prefix is enough)
        id: String,
    },
}

/// Run the favorites command
pub fn run(args: FavoritesArgs) -> Result<()> {
    let config = Config::load()?;
    let mut session = open_session(&config)?;

    match args.command.unwrap_or(FavoritesCommand::List) {
        FavoritesCommand::List => list_favorites(&session, args.json),
        FavoritesCommand::Show { id } => show_favorite(&session, &id, args.json),
        FavoritesCommand::Remove { id } => remove_favorite(&mut session, &id),
        FavoritesCommand::Focus { id } => focus_favorite(&mut session, &id, args.json),
    }
}

/// Resolve a full or prefix ID to exactly one favorite
fn find_id(session: &MapSession, prefix: &str) -> Result<PlaceId> {
    let prefix = prefix.trim().to_lowercase();
    let mut matches = session
        .state()
        .favorites
        .list()
        .iter()
        .filter(|p| p.id.to_string().starts_with(&prefix));

    match (matches.next(), matches.next()) {
        (Some(place), None) => Ok(place.id),
        (Some(_), Some(_)) => Err(Error::Validation(format!("Ambiguous place id: {}", prefix))),
        (None, _) => Err(Error::NotFound(format!("Favorite {}", prefix))),
    }
}

/// List saved places in insertion order
fn list_favorites(session: &MapSession, json: bool) -> Result<()> {
    let favorites = session.state().favorites.list();

    if json {
        println!("{}", serde_json::to_string_pretty(favorites)?);
        return Ok(());
    }

    if favorites.is_empty() {
        println!("No saved places.");
        return Ok(());
    }

    println!("Saved places ({}):\n", favorites.len());
    for place in favorites {
        let id = place.id.to_string();
        println!(
            "  {} - {} [{}]\n    {}\n",
            &id[..8],
            place.name,
            place.category.style().label,
            format_coords(&place.coordinates())
        );
    }

    Ok(())
}

/// Show one saved place
fn show_favorite(session: &MapSession, id: &str, json: bool) -> Result<()> {
    let id = find_id(session, id)?;
    let place = session
        .state()
        .favorites
        .get(&id)
        .ok_or_else(|| Error::NotFound(format!("Favorite {}", id)))?;

    if json {
        println!("{}", serde_json::to_string_pretty(place)?);
        return Ok(());
    }

    let style = place.category.style();
    println!("Place: {}", place.name);
    println!("ID: {}", place.id);
    println!("Category: {} ({}, {})", style.label, style.color, style.icon);
    println!("Location: {}", format_coords(&place.coordinates()));
    println!("Saved: {}", place.created_at.format("%Y-%m-%d %H:%M:%S UTC"));

    Ok(())
}

/// Remove a saved place
fn remove_favorite(session: &mut MapSession, id: &str) -> Result<()> {
    let id = find_id(session, id)?;
    session.remove_favorite(&id);

    if !session.state().favorites.is_synced() {
        return Err(Error::Storage("Removal could not be written to disk".to_string()));
    }
    Ok(())
}

/// Focus a saved place and print where the camera goes
fn focus_favorite(session: &mut MapSession, id: &str, json: bool) -> Result<()> {
    let id = find_id(session, id)?;
    let place = session.focus_favorite(&id)?;
    let camera = session.camera();

    if json {
        println!("{}", serde_json::to_string_pretty(&camera)?);
    } else {
        println!(
            "{}: center {} zoom {} ({}s flight)",
            place.name,
            format_coords(&camera.center),
            camera.zoom,
            camera.animate_secs
        );
    }
    Ok(())
}
