use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use airport_weather::client::DEFAULT_BASE_URL;
use airport_weather::{AppConfig, WeatherClient, WeatherStore, loader, logging, web};

/// In-memory airport weather service
#[derive(Parser, Debug)]
#[command(name = "airport-weather", version)]
#[command(about = "Airport weather repository: serve readings, upload airports, smoke-test a server")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "AIRPORT_WEATHER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Seed file with IATA,latitude,longitude lines
        #[arg(long)]
        airports: Option<PathBuf>,

        /// Listen port, overriding the configured one
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Upload a full airport data file to a running server
    Upload {
        /// Airport file (id,name,city,country,iata,icao,lat,lon,...)
        file: PathBuf,

        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Ping, populate and query a running server
    Smoke {
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging)?;

    match cli.command {
        Command::Serve { airports, port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if airports.is_some() {
                config.data.airports_file = airports;
            }
            serve(config).await
        }
        Command::Upload { file, base_url } => upload(file, &base_url).await,
        Command::Smoke { base_url } => smoke(&base_url).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let store = Arc::new(WeatherStore::with_max_radius(config.query.max_radius_km));

    if let Some(path) = &config.data.airports_file {
        let airports = loader::load_seed_file(path)
            .with_context(|| format!("Failed to read airports from {}", path.display()))?;
        store
            .seed(airports)
            .with_context(|| format!("Invalid airport in {}", path.display()))?;
    }

    web::run(config.listen_addr()?, store).await
}

async fn upload(file: PathBuf, base_url: &str) -> Result<()> {
    let reader = BufReader::new(
        File::open(&file).with_context(|| format!("{} is not a valid input", file.display()))?,
    );
    let airports = loader::read_airport_records(reader)?;
    let client = WeatherClient::new(base_url)?;
    let accepted = client.upload_airports(&airports).await?;
    info!("Uploaded {accepted} of {} airports", airports.len());
    Ok(())
}

async fn smoke(base_url: &str) -> Result<()> {
    let client = WeatherClient::new(base_url)?;
    client.ping_collect().await?;
    client.populate().await?;
    let readings = client.query("BOS", 0.0).await?;
    info!("query.get: {}", serde_json::to_string(&readings)?);
    client.ping_query().await?;
    info!("complete");
    Ok(())
}
