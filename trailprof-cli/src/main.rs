use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use trailprof::{ProfileEngine, ProfileEngineBuilder, ProviderKind};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;

/// Elevation profiles for trails and streams
#[derive(Parser)]
#[command(name = "trailprof")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum number of points queried per profile
    #[arg(short, long, env = "TRAILPROF_MAX_SAMPLE_POINTS", global = true)]
    max_points: Option<usize>,

    /// Pause between per-point provider requests, in milliseconds
    #[arg(long, env = "TRAILPROF_INTER_POINT_DELAY_MS", global = true)]
    delay_ms: Option<u64>,

    /// Provider priority, e.g. "image-server,open-elevation"
    #[arg(short, long, env = "TRAILPROF_PROVIDERS", global = true)]
    providers: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "TRAILPROF_TIMEOUT_SECS", global = true)]
    timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the elevation profile of a line
    Profile {
        /// GeoJSON or CSV file, or '-' to read GeoJSON from stdin
        #[arg(required_unless_present = "coords")]
        input: Option<String>,

        /// Inline path as "lon,lat;lon,lat;..."
        #[arg(long, conflicts_with = "input")]
        coords: Option<String>,

        /// Output the profile as JSON
        #[arg(short, long)]
        json: bool,

        /// Also write the samples to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also write the profile as a GeoJSON LineString with elevations
        #[arg(long)]
        geojson: Option<PathBuf>,
    },

    /// Show which points a profile would query, without contacting providers
    Sample {
        /// GeoJSON or CSV file, or '-' to read GeoJSON from stdin
        #[arg(required_unless_present = "coords")]
        input: Option<String>,

        /// Inline path as "lon,lat;lon,lat;..."
        #[arg(long, conflicts_with = "input")]
        coords: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the elevation providers in the order they are tried
    Providers,
}

impl Cli {
    /// Engine settings: `TRAILPROF_*` environment first, flags on top.
    fn engine(&self) -> Result<ProfileEngine> {
        let mut builder =
            ProfileEngineBuilder::from_env().context("Invalid TRAILPROF_* environment")?;

        if let Some(max_points) = self.max_points {
            builder = builder.max_sample_points(max_points);
        }
        if let Some(ms) = self.delay_ms {
            builder = builder.inter_point_delay(Duration::from_millis(ms));
        }
        if let Some(list) = &self.providers {
            builder = builder.provider_priority(ProviderKind::parse_list(list)?);
        }
        if let Some(secs) = self.timeout {
            builder = builder.timeout_secs(secs);
        }

        builder.build().context("Failed to configure profile engine")
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "trailprof=info,warn",
        _ => "trailprof=debug,info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Profile {
            input,
            coords,
            json,
            csv,
            geojson,
        } => {
            let path = input::resolve(input.as_deref(), coords.as_deref())?;
            commands::profile::run(
                &cli.engine()?,
                &path,
                *json,
                csv.as_deref(),
                geojson.as_deref(),
            )
        }
        Commands::Sample {
            input,
            coords,
            json,
        } => {
            let path = input::resolve(input.as_deref(), coords.as_deref())?;
            commands::sample::run(&cli.engine()?, &path, *json)
        }
        Commands::Providers => commands::providers::run(&cli.engine()?),
    }
}
