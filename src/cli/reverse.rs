//! Reverse command handler
//!
//! Behaves like a map click: names the place at a coordinate pair.

use crate::category::Category;
use crate::cli::{open_session, print_completion};
use crate::config::Config;
use crate::error::Result;
use crate::geo::{Coordinates, HttpGateway};
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Save the place as a favorite with this name
    #[arg(long, short = 's')]
    pub save: Option<String>,

    /// Category for the saved favorite
    #[arg(long, short = 'c', requires = "save")]
    pub category: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let config = Config::load()?;
    let gateway = HttpGateway::new(&config.geocoder)?;
    let mut session = open_session(&config)?;

    let completion = session
        .click(&gateway, Coordinates::new(args.lat, args.lng))
        .await?;

    if !print_completion(&completion, args.json)? {
        // The point is still a valid candidate, just unnamed.
        if let Some(candidate) = session.state().selection.current() {
            println!("{}", candidate.name);
        }
    }

    // Unlike search, a click always leaves a candidate to save.
    if let Some(name) = args.save {
        let category = args.category.as_deref().map(Category::resolve);
        let place = session.save_selection(&name, category)?;
        println!("Saved as {} [{}] ({})", place.name, place.category, place.id);
    }

    Ok(())
}
