//! Route command handler
//!
//! Runs one search or map selection through a planning session and prints
//! the outcome.

use crate::cli::init_logging;
use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::location::fixed::FixedPositionSource;
use crate::location::ip::IpPositionSource;
use crate::location::ConfiguredSource;
use crate::planner::{LiveSession, PlanningStatus};
use clap::Args;

/// Route command arguments
#[derive(Args)]
pub struct RouteArgs {
    /// Destination to search for
    #[arg(required_unless_present_any = ["to", "list_formats"], conflicts_with = "to")]
    pub query: Option<String>,

    /// Destination coordinate as LAT,LNG
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub to: Option<Coordinate>,

    /// Origin coordinate as LAT,LNG
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true, conflicts_with = "here")]
    pub from: Option<Coordinate>,

    /// Use current location (IP geolocation) as origin
    #[arg(long)]
    pub here: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the route command
pub async fn run(args: RouteArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    init_logging("warn");
    let config = Config::load()?;

    let format = args.format.unwrap_or_else(|| config.defaults.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let source = origin_source(args.from, args.here, &config)?;
    let locate = !matches!(source, ConfiguredSource::Disabled);
    let session = LiveSession::from_config(&config, source)?;

    if locate {
        if let Err(e) = session.retry_location().await {
            eprintln!("{}", e);
        }
    }

    let state = match (&args.query, args.to) {
        (Some(query), _) => session.search(query).await,
        (None, Some(point)) => session.select(point).await?,
        (None, None) => {
            return Err(Error::Config(
                "Specify a destination query or --to LAT,LNG".to_string(),
            ))
        }
    };

    let output = formatter.format(&state)?;
    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    if state.status == PlanningStatus::Error {
        std::process::exit(1);
    }

    Ok(())
}

/// Pick the position source for the origin
fn origin_source(from: Option<Coordinate>, here: bool, config: &Config) -> Result<ConfiguredSource> {
    if let Some(point) = from {
        return Ok(ConfiguredSource::Fixed(FixedPositionSource::new(point)?));
    }
    if here {
        return Ok(ConfiguredSource::Ip(IpPositionSource::new(
            config.location.ip_api_url.as_str(),
        )?));
    }
    ConfiguredSource::from_config(&config.location)
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
