mod locator;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gqmap-cli")]
#[command(about = "GranolaQuest store locator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the configured storefront variants
    Variants,
    /// Load a variant and print the nearest stores in a viewport
    Nearby(NearbyArgs),
    /// Geocode a free-text location
    Search {
        /// Place name, address, or postal code
        query: String,
    },
}

#[derive(Debug, clap::Args)]
pub(crate) struct NearbyArgs {
    /// Variant slug (defaults to `GQMAP_VARIANT`)
    #[arg(long)]
    pub variant: Option<String>,

    /// Device latitude; omit to use the fallback location
    #[arg(long, allow_negative_numbers = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Device longitude
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Explicit viewport bounds; without them the viewport is derived
    /// from the user location, zoom, and screen size
    #[arg(long, allow_negative_numbers = true, requires_all = ["north", "west", "east"])]
    pub south: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires_all = ["south", "west", "east"])]
    pub north: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires_all = ["south", "north", "east"])]
    pub west: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires_all = ["south", "north", "west"])]
    pub east: Option<f64>,

    /// Centre the map on a geocoded place instead of the user location;
    /// distances are still measured from the user
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["south", "north", "west", "east"])]
    pub near: Option<String>,

    /// Map zoom level (defaults to the initial zoom for the screen width,
    /// or the search zoom with --near)
    #[arg(long, allow_negative_numbers = true)]
    pub zoom: Option<f64>,

    /// Screen width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Screen height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Print the render plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = gqmap_core::load_app_config()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Variants) => locator::run_variants(&config)?,
        Some(Commands::Nearby(args)) => locator::run_nearby(&config, &args).await?,
        Some(Commands::Search { query }) => locator::run_search(&config, &query).await?,
        None => println!("gqmap-cli ready; see --help for commands"),
    }

    Ok(())
}
