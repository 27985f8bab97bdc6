//! CLI frontend for the heist engine.

mod bots;
mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "heist",
    about = "Crew heists: browse the catalog, check the odds, run a heist with bots",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List locations, roles and equipment
    Catalog,

    /// Compute the odds for a hypothetical crew
    Odds {
        /// Location key (e.g. bank, casino)
        #[arg(short, long)]
        location: String,

        /// Crew size; roles are filled in catalog order
        #[arg(
            short,
            long,
            default_value = "5",
            value_parser = clap::value_parser!(u8).range(3..=5)
        )]
        crew: u8,

        /// Leader posture: cautious, neutral, aggressive
        #[arg(short, long, default_value = "neutral")]
        posture: String,

        /// Role whose task failed (repeatable)
        #[arg(long)]
        fail: Vec<String>,

        /// Role whose task timed out (repeatable)
        #[arg(long)]
        timeout: Vec<String>,

        /// Equipment as role=item (repeatable)
        #[arg(short, long)]
        gear: Vec<String>,
    },

    /// Run a full heist with a bot crew and an in-memory ledger
    Simulate {
        /// Location key (e.g. bank, casino)
        #[arg(short, long)]
        location: String,

        /// Crew size; roles are filled in catalog order
        #[arg(
            short,
            long,
            default_value = "3",
            value_parser = clap::value_parser!(u8).range(3..=5)
        )]
        crew: u8,

        /// RNG seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,

        /// Task window in milliseconds
        #[arg(long)]
        window_ms: Option<u64>,

        /// Role whose bot never answers (repeatable)
        #[arg(long)]
        afk: Vec<String>,

        /// Equipment to buy as role=item (repeatable)
        #[arg(short, long)]
        gear: Vec<String>,

        /// Leader posture: cautious, neutral, aggressive
        #[arg(short, long, default_value = "neutral")]
        posture: String,

        /// Starting balance of every bot
        #[arg(short, long, default_value = "2000")]
        balance: i64,

        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Log engine activity to stderr
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    // targets match by prefix, so `heist` covers the heist_* crates too
    let default = if verbose { "heist=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Simulate { verbose: true, .. });
    init_tracing(verbose);

    let result = match cli.command {
        Commands::Catalog => commands::catalog::run(),
        Commands::Odds {
            location,
            crew,
            posture,
            fail,
            timeout,
            gear,
        } => commands::odds::run(&commands::odds::OddsArgs {
            location,
            crew: usize::from(crew),
            posture,
            fail,
            timeout,
            gear,
        }),
        Commands::Simulate {
            location,
            crew,
            seed,
            window_ms,
            afk,
            gear,
            posture,
            balance,
            config,
            json,
            verbose: _,
        } => commands::simulate::run(commands::simulate::SimulateArgs {
            location,
            crew: usize::from(crew),
            seed,
            window_ms,
            afk,
            gear,
            posture,
            balance,
            config,
            json,
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
