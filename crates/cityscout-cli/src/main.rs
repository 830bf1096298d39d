mod explore;
mod lookup;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use cityscout_core::{load_categories, AppConfig, Category, CategoryMap};
use cityscout_places::PlacesFacade;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cityscout-cli")]
#[command(about = "Explore cities through the Google Maps places services")]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a city name to coordinates
    Geocode {
        /// City or address to resolve
        city: String,
    },
    /// List places of a category around a city
    Nearby {
        /// City to search around
        city: String,
        /// attraction, lodging, restaurant, or a provider place type
        #[arg(long, default_value = "attraction")]
        category: Category,
    },
    /// Show extended details for one place id
    Detail {
        /// Provider place id
        place_id: String,
    },
    /// Suggest city names for partial input
    Autocomplete {
        /// Partial city name
        input: String,
    },
    /// Build the full city page: places with details and photos
    Explore {
        /// City to explore
        city: String,
        /// attraction, lodging, restaurant, or a provider place type
        #[arg(long, default_value = "attraction")]
        category: Category,
    },
    /// Read city names from stdin; each line supersedes the previous one
    Browse {
        /// attraction, lodging, restaurant, or a provider place type
        #[arg(long, default_value = "attraction")]
        category: Category,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cityscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("cityscout-cli ready; run with --help for commands");
        return Ok(());
    };

    let facade = Arc::new(build_facade(&config)?);
    let json = cli.json;

    match command {
        Commands::Geocode { city } => lookup::run_geocode(&facade, &city, json).await,
        Commands::Nearby { city, category } => {
            lookup::run_nearby(&facade, &city, &category, json).await
        }
        Commands::Detail { place_id } => lookup::run_detail(&facade, &place_id, json).await,
        Commands::Autocomplete { input } => lookup::run_autocomplete(&facade, &input, json).await,
        Commands::Explore { city, category } => {
            explore::run_explore(&facade, &city, &category, config.detail_concurrency, json).await
        }
        Commands::Browse { category } => {
            explore::run_browse(facade, category, config.detail_concurrency, json).await
        }
    }
}

fn build_facade(config: &AppConfig) -> anyhow::Result<PlacesFacade> {
    let categories = match &config.categories_path {
        Some(path) => load_categories(path)?,
        None => CategoryMap::default(),
    };
    Ok(PlacesFacade::from_app_config(config, categories))
}

/// Prints `value` as pretty JSON.
fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests;
