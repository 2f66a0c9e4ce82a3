//! Command-line front end for the Tripweaver engine.
//!
//! Takes a JSON catalogue snapshot (an array of raw POI records) and a
//! JSON trip-parameters file, builds the itinerary, and writes it to
//! stdout as JSON. Distances use great-circle maths; wiring a road-graph
//! source is an embedding concern, not a CLI flag.
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use thiserror::Error;

use tripweaver_core::{Itinerary, PoiRecord, TripParams};
use tripweaver_planner::{ItineraryBuilder, PlanError};
use tripweaver_routing::{HaversineOracle, SequencingStrategy};

/// Run the Tripweaver CLI with the current process arguments.
///
/// # Errors
/// Returns [`CliError`] for argument, input, planning, or output
/// failures; the binary maps any error to a non-zero exit.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(&args),
    }
}

fn run_plan(args: &PlanArgs) -> Result<(), CliError> {
    let records: Vec<PoiRecord> = read_json(&args.catalog)?;
    let params: TripParams = read_json(&args.params)?;
    let strategy = if args.nearest_neighbour {
        SequencingStrategy::NearestNeighbour
    } else {
        SequencingStrategy::MstPreorder
    };
    let itinerary = ItineraryBuilder::new(HaversineOracle)
        .with_strategy(strategy)
        .build(&params, &records, &args.weather)?;
    write_itinerary(&itinerary)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let file = File::open(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::ParseInput {
        path: path.to_path_buf(),
        source,
    })
}

fn write_itinerary(itinerary: &Itinerary) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, itinerary).map_err(CliError::SerialiseOutput)?;
    handle.write_all(b"\n").map_err(CliError::WriteOutput)
}

#[derive(Debug, Parser)]
#[command(
    name = "tripweaver",
    about = "Build multi-day travel itineraries from a POI catalogue snapshot",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build an itinerary from a catalogue and trip parameters.
    Plan(PlanArgs),
}

/// Arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser)]
struct PlanArgs {
    /// Path to the catalogue snapshot: a JSON array of POI records.
    #[arg(long, value_name = "path")]
    catalog: PathBuf,
    /// Path to the trip parameters JSON.
    #[arg(long, value_name = "path")]
    params: PathBuf,
    /// Weather description for each day, repeatable in day order.
    #[arg(long, value_name = "description")]
    weather: Vec<String>,
    /// Use the nearest-neighbour heuristic instead of MST preorder.
    #[arg(long)]
    nearest_neighbour: bool,
}

/// Errors emitted by the Tripweaver CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadInput {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An input file was not valid JSON for its schema.
    #[error("failed to parse {path}: {source}")]
    ParseInput {
        /// Offending path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// The build rejected the trip parameters.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// The itinerary could not be serialised.
    #[error("failed to serialise the itinerary: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing to stdout failed.
    #[error("failed to write the itinerary: {0}")]
    WriteOutput(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn plan_requires_catalog_and_params() {
        assert!(parse(&["tripweaver", "plan"]).is_err());
        assert!(parse(&["tripweaver", "plan", "--catalog", "pois.json"]).is_err());
    }

    #[rstest]
    #[case(&["tripweaver", "plan", "--catalog", "pois.json", "--params", "trip.json"], false)]
    #[case(
        &["tripweaver", "plan", "--catalog", "pois.json", "--params", "trip.json", "--nearest-neighbour"],
        true
    )]
    fn plan_parses_strategy_flag(#[case] args: &[&str], #[case] nearest: bool) {
        let cli = parse(args).expect("arguments are valid");
        let Command::Plan(plan) = cli.command;
        assert_eq!(plan.nearest_neighbour, nearest);
    }

    #[test]
    fn weather_flag_repeats_in_day_order() {
        let cli = parse(&[
            "tripweaver",
            "plan",
            "--catalog",
            "pois.json",
            "--params",
            "trip.json",
            "--weather",
            "rain",
            "--weather",
            "sunny",
        ])
        .expect("arguments are valid");
        let Command::Plan(plan) = cli.command;
        assert_eq!(plan.weather, vec!["rain".to_owned(), "sunny".into()]);
    }

    #[test]
    fn missing_catalog_file_reports_its_path() {
        let args = PlanArgs {
            catalog: PathBuf::from("/definitely/not/here.json"),
            params: PathBuf::from("/also/not/here.json"),
            weather: Vec::new(),
            nearest_neighbour: false,
        };
        let err = run_plan(&args).expect_err("catalog is missing");
        assert!(matches!(err, CliError::ReadInput { .. }));
    }
}
