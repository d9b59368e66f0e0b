//! Headless combat runner.
//!
//! # Usage
//!
//! ```bash
//! # Run a scenario for 3600 ticks of 16 ms
//! cargo run -p combat_headless -- run --scenario scenarios/skirmish.ron
//!
//! # Same, with a different seed and the event stream on stdout
//! cargo run -p combat_headless -- run --scenario scenarios/skirmish.ron --seed 7 --json
//!
//! # Built-in fixture scenario
//! cargo run -p combat_headless -- builtin --ticks 600
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use combat_headless::{run_scenario, RunConfig, RunError, RunSummary, Scenario};

#[derive(Parser)]
#[command(name = "combat_headless")]
#[command(about = "Headless combat runner for balance checks and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file
    Run {
        /// Scenario file to load
        #[arg(short, long)]
        scenario: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Run the built-in fixture scenario
    Builtin {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Maximum number of ticks to simulate
    #[arg(short, long, default_value = "3600")]
    ticks: u64,

    /// Random seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Milliseconds per tick
    #[arg(long, default_value = "16")]
    tick_ms: u32,

    /// Print every non-empty tick as a JSON line on stdout
    #[arg(long)]
    json: bool,
}

impl From<&RunArgs> for RunConfig {
    fn from(args: &RunArgs) -> Self {
        Self {
            ticks: args.ticks,
            tick_ms: args.tick_ms,
            seed: args.seed,
            json: args.json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for the event stream
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    let result = match &cli.command {
        Commands::Run { scenario, run } => cmd_run(scenario, run),
        Commands::Builtin { run } => cmd_builtin(run),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Run a scenario loaded from disk.
fn cmd_run(path: &Path, args: &RunArgs) -> Result<RunSummary, RunError> {
    tracing::info!(path = %path.display(), "Loading scenario");
    let scenario = Scenario::load(path)?;
    execute(&scenario, args)
}

/// Run the built-in scenario.
fn cmd_builtin(args: &RunArgs) -> Result<RunSummary, RunError> {
    execute(&Scenario::builtin(), args)
}

fn execute(scenario: &Scenario, args: &RunArgs) -> Result<RunSummary, RunError> {
    let config = RunConfig::from(args);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run_scenario(scenario, &config, &mut out)?;

    if config.json {
        serde_json::to_writer(&mut out, &summary)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "{}: {:?} after {} ticks | player dmg {} kills {} bounty {} | enemy dmg {} | terminal {:?}",
            summary.scenario,
            summary.outcome,
            summary.ticks,
            summary.player.damage_dealt,
            summary.player.kills,
            summary.player.bounty,
            summary.enemy.damage_dealt,
            summary.terminal_hp,
        )?;
    }
    Ok(summary)
}
