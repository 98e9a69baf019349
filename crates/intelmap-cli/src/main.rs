//! intelmap: import intel reports into a geocoded entity graph.

mod display;
mod import;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use intelmap_core::{CoordinateResolver, is_recognised_report, segment};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "intelmap", version, about = "Intel report entity extraction and mapping")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a report and print its summary card.
    Import {
        /// Report file (.txt or .pdf)
        file: PathBuf,
        /// Print the full graph as JSON instead of the summary card
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        geo: GeoArgs,
    },

    /// Check whether a file is a recognised intel report.
    Check {
        /// Report file (.txt or .pdf)
        file: PathBuf,
    },

    /// Geocode a station or place name.
    Locate {
        name: String,
        #[command(flatten)]
        geo: GeoArgs,
    },
}

/// Resolver and rendering options shared by `import` and `locate`.
#[derive(Args, Debug, Clone)]
pub struct GeoArgs {
    /// Offline postcode lookup JSON (`{"SW1A2AA": {"lat": .., "lon": ..}}`)
    #[arg(long, env = "INTELMAP_POSTCODES")]
    pub postcodes: Option<PathBuf>,

    /// Postcode API base URL
    #[arg(long, env = "INTELMAP_POSTCODE_API", default_value = "https://api.postcodes.io")]
    pub postcode_api: String,

    /// Place search API base URL
    #[arg(
        long,
        env = "INTELMAP_PLACE_SEARCH",
        default_value = "https://nominatim.openstreetmap.org"
    )]
    pub place_search: String,

    /// Never call network resolvers
    #[arg(long)]
    pub offline: bool,

    /// Airport GeoJSON
    #[arg(long, env = "INTELMAP_AIRPORTS")]
    pub airports: Option<PathBuf>,

    /// Icon catalogue JSON (defaults to the built-in set)
    #[arg(long)]
    pub icons: Option<PathBuf>,

    /// Per-request timeout for network lookups
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Segments per flight arc
    #[arg(long, default_value_t = 50)]
    pub arc_segments: usize,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Import { file, json, geo } => {
            let (result, stats) = import::run_import(&file, &geo).await?;
            if json {
                let doc = import::JsonImport::new(&file, &result);
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                display::print_summary_card(&result);
                eprintln!("  Imported in {:.2}s", stats.elapsed_secs);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { file } => {
            let text = import::read_report(&file)?;
            if !is_recognised_report(&text) {
                println!("{}: not a recognised intel report", file.display());
                return Ok(ExitCode::FAILURE);
            }
            let report = segment(&text);
            println!(
                "{}: {} {} ({}), {} entries",
                file.display(),
                report.header.report_id,
                report.header.operation_name,
                report.header.date,
                report.entries.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Locate { name, geo } => {
            let resolvers = import::Resolvers::build(&geo)?;
            match resolvers.stations.resolve(&name).await? {
                Some(p) => {
                    println!("{name}: {:.6}, {:.6}", p.lat, p.lng);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("{name}: not found");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
