//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "map.zoom")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("Available keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        },

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[map]");
    println!("home_lat = {}", config.map.home_lat);
    println!("home_lng = {}", config.map.home_lng);
    println!("zoom = {}", config.map.zoom);
    println!("focus_zoom = {}", config.map.focus_zoom);
    println!("fly_duration_secs = {}", config.map.fly_duration_secs);
    println!();

    println!("[geocoder]");
    println!("nominatim_url = \"{}\"", config.geocoder.nominatim_url);
    println!("postal_url = \"{}\"", config.geocoder.postal_url);
    println!("user_agent = \"{}\"", config.geocoder.user_agent);
    println!("retries = {}", config.geocoder.retries);
    println!();

    println!("[storage]");
    println!("key = \"{}\"", config.storage.key);
    match &config.storage.dir {
        Some(dir) => println!("dir = \"{}\"", dir.display()),
        None => println!("dir = \"\" # XDG data dir"),
    }
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
}
