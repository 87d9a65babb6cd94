//! BigQuery catalog-discovery tap.
//!
//! Connects to a BigQuery project with one of three credential
//! strategies and writes the discovery catalog (datasets, tables, and
//! views) as JSON. Record extraction is driven by the surrounding
//! extraction framework, not this binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tap_bigquery_core::{
    BigQueryConnector, BigQueryDiscovery, Catalog, CatalogDiscovery, Result, TapConfig,
    discover_catalog, init_logging,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tap-bigquery")]
#[command(about = "BigQuery catalog-discovery tap")]
#[command(version)]
#[command(long_about = "
tap-bigquery - BigQuery catalog discovery

Enumerates the datasets, tables, and views a set of credentials can see
and emits them as a JSON catalog.

CREDENTIALS (first match wins):
  1. client_secrets     - inline service-account key in the config
  2. credentials_path   - path to a service-account key file
  3. application default credentials (GOOGLE_APPLICATION_CREDENTIALS)

EXAMPLES:
  tap-bigquery --config config.json discover
  tap-bigquery --config config.json discover --output catalog.json
  tap-bigquery --config config.json test
")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Tap configuration file
    #[arg(
        short,
        long,
        env = "TAP_BIGQUERY_CONFIG",
        help = "Path to the JSON config file (project_id, credentials, filter_schemas)"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Discover schemas and tables and write the catalog
    Discover(DiscoverArgs),
    /// Test the BigQuery connection
    Test,
}

#[derive(Args, Default)]
struct DiscoverArgs {
    /// Catalog output path; stdout when omitted
    #[arg(short, long, help = "Write the catalog to this file instead of stdout")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let config = TapConfig::from_file(&cli.config).map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    info!("Loaded config: {}", config);

    match cli.command {
        Some(Command::Test) => test_connection(config).await,
        Some(Command::Discover(args)) => discover(config, &args).await,
        None => discover(config, &DiscoverArgs::default()).await,
    }
}

/// Connects and runs the connection probe.
async fn test_connection(config: TapConfig) -> Result<()> {
    info!("Testing BigQuery connection...");

    let client = BigQueryConnector::new(config.clone()).connect().await?;
    let discovery = BigQueryDiscovery::new(client, &config);

    discovery.test_connection().await.map_err(|e| {
        error!("Connection test failed: {}", e);
        e
    })?;

    println!("Connection to {} successful", config.connection_url());
    Ok(())
}

/// Connects, walks the catalog, and writes it out.
async fn discover(config: TapConfig, args: &DiscoverArgs) -> Result<()> {
    info!("Starting catalog discovery for {}", config.connection_url());

    let client = BigQueryConnector::new(config.clone()).connect().await?;
    let discovery = BigQueryDiscovery::new(client, &config);

    let catalog = discover_catalog(&discovery).await.map_err(|e| {
        error!("Catalog discovery failed: {}", e);
        e
    })?;

    write_catalog(&catalog, args.output.as_deref()).await?;

    info!("Discovery completed: {} streams", catalog.len());
    Ok(())
}

/// Writes the catalog as pretty JSON to a file or stdout.
async fn write_catalog(catalog: &Catalog, output: Option<&std::path::Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog).map_err(|e| {
        tap_bigquery_core::TapError::serialization("catalog serialization", e)
    })?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &json).await.map_err(|e| {
                tap_bigquery_core::TapError::io(
                    format!("Failed to write catalog to {}", path.display()),
                    e,
                )
            })?;
            info!("Catalog written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
