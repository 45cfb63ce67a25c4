//! Command-line front end: find shapes in a JSON market snapshot.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use eyre::{Error, Result};
use itertools::Itertools;
use log::info;
use shapes::arb::{build_graph, find_shapes_in_graph, Market, SearchOptions, Shape, SymbolGraph};
use shapes::config::Config;
use shapes::snapshot::Snapshot;
use shapes::utils::logger::setup_logger;

/// Command line
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// What to do
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands
#[derive(Subcommand)]
enum Commands {
    /// Find shapes in a snapshot
    Find {
        /// Snapshot and search options
        #[command(flatten)]
        search: SearchArgs,
        /// Print shapes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find shapes and list every unique path through each of them
    Paths {
        /// Snapshot and search options
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print market and graph statistics of a snapshot
    Stats {
        /// Snapshot file
        #[arg(long)]
        snapshot: PathBuf,
    },
}

/// Options shared by the searching subcommands
#[derive(Args)]
struct SearchArgs {
    /// Snapshot file
    #[arg(long)]
    snapshot: PathBuf,
    /// Shape length to search for, repeatable (default from SHAPES_LENGTHS, else 3)
    #[arg(long = "length")]
    lengths: Vec<usize>,
    /// Maximum number of venues a shape may span (default from SHAPES_MAX_VENUES)
    #[arg(long)]
    max_venues: Option<usize>,
}

/// Loads the snapshot and builds its graph, with search options from the environment and
/// the command line.
fn prepare(args: &SearchArgs) -> Result<(SymbolGraph, SearchOptions), Error> {
    let config = Config::from_env()?.overridden(&args.lengths, args.max_venues);
    let options = SearchOptions::new(&config.lengths, config.max_unique_venues)?;

    let snapshot = Snapshot::load(&args.snapshot)?;
    info!(
        "Loaded {} markets from {}",
        snapshot.market_count(),
        args.snapshot.display()
    );
    Ok((build_graph(&snapshot.markets, &snapshot.tickers), options))
}

/// Prints every shape, grouped by length
fn find(args: &SearchArgs, json: bool) -> Result<(), Error> {
    let (graph, options) = prepare(args)?;
    let shapes = find_shapes_in_graph(&graph, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&shapes)?);
        return Ok(());
    }
    for (length, shapes) in &shapes {
        println!("{} shapes of length {length}", shapes.len());
        for shape in shapes {
            println!("  {shape}");
        }
    }
    Ok(())
}

/// Prints every shape followed by its unique paths
fn paths(args: &SearchArgs) -> Result<(), Error> {
    let (graph, options) = prepare(args)?;
    let shapes = find_shapes_in_graph(&graph, &options)?;

    for shape in shapes.values().flatten() {
        print_paths(shape)?;
    }
    Ok(())
}

/// Prints one shape and its unique paths
fn print_paths(shape: &Shape) -> Result<(), Error> {
    println!("{shape}");
    for path in shape.unique_paths()? {
        println!("  {path}");
    }
    Ok(())
}

/// Prints what the normalizer and graph builder made of a snapshot
fn stats(snapshot: &Path) -> Result<(), Error> {
    let snapshot = Snapshot::load(snapshot)?;
    let graph = build_graph(&snapshot.markets, &snapshot.tickers);

    let markets = graph.markets();
    println!(
        "venues: {}",
        markets.iter().map(Market::venue).unique().count()
    );
    println!("listed markets: {}", snapshot.market_count());
    println!("live markets: {}", graph.len());
    println!(
        "unresolved markets: {}",
        markets.iter().filter(|market| !market.is_resolved()).count()
    );
    println!("edges: {}", graph.edge_count());
    if let Some(busiest) = (0..graph.len()).max_by_key(|&position| graph.edges(position).len()) {
        if let Some(market) = graph.market(busiest) {
            println!(
                "most connected: {} ({} edges)",
                market.key,
                graph.edges(busiest).len()
            );
        }
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    setup_logger()?;

    let cli = Cli::parse();
    match &cli.command {
        Commands::Find { search, json } => find(search, *json)?,
        Commands::Paths { search } => paths(search)?,
        Commands::Stats { snapshot } => stats(snapshot)?,
    }

    Ok(())
}
