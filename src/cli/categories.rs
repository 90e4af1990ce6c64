//! Categories command handler

use crate::category::available_categories;
use crate::error::Result;
use clap::Args;

/// Categories command arguments
#[derive(Args)]
pub struct CategoriesArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the categories command
pub fn run(args: CategoriesArgs) -> Result<()> {
    let categories = available_categories();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    println!("Available categories:");
    for info in categories {
        println!(
            "  {:<10} {:<10} {}  ({})",
            info.id, info.style.label, info.style.color, info.style.icon
        );
    }
    Ok(())
}
