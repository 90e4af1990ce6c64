//! geopin CLI entry point
//!
//! Favorite places map engine - CLI + web app

use geopin::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
