//! Search command handler
//!
//! Geocodes an address or postal code, optionally saving the hit.

use crate::category::Category;
use crate::cli::{open_session, print_completion};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::HttpGateway;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Address, place name or 8-digit postal code
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Save the result as a favorite with this name
    #[arg(long, short = 's')]
    pub save: Option<String>,

    /// Category for the saved favorite
    #[arg(long, short = 'c', requires = "save")]
    pub category: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let gateway = HttpGateway::new(&config.geocoder)?;
    let mut session = open_session(&config)?;

    let query = args.query.join(" ");
    let completion = session
        .search(&gateway, &query)
        .await
        .ok_or_else(|| Error::Validation("Search query is empty".to_string()))?;

    if !print_completion(&completion, args.json)? {
        return Err(Error::NotFound(format!("No place matches {:?}", query)));
    }

    if let Some(name) = args.save {
        let category = args.category.as_deref().map(Category::resolve);
        let place = session.save_selection(&name, category)?;
        println!("Saved as {} [{}] ({})", place.name, place.category, place.id);
    }

    Ok(())
}
