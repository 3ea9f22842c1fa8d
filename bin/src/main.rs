//! famarank CLI binary.
//!
//! Ranks equities on Fama-French style factors and backtests quartile
//! portfolios built from the ranks.

mod cmd;

use std::{path::PathBuf, process};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use famarank::PipelineConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "famarank")]
#[command(about = "Factor ranking and quartile backtests for equities", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the input tables
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory receiving the output tables
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Keep a versioned copy of every file before replacing it
    #[arg(long, global = true)]
    backup: bool,
}

#[derive(Args)]
struct GridArgs {
    /// Rank columns or factor names to backtest
    #[arg(short, long, value_delimiter = ',')]
    factors: Vec<String>,

    /// Holding periods to backtest (quarterly, yearly, 2_years, 3_years, 5_years)
    #[arg(short, long, value_delimiter = ',')]
    periods: Vec<String>,

    /// Print the per-quartile rank summary of each unit
    #[arg(long)]
    summary: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available factors
    Factors {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compute factors and replace the ranking table
    Rank,

    /// Backtest quartile portfolios over the stored ranking
    Backtest {
        #[command(flatten)]
        grid: GridArgs,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Rank, then backtest the fresh ranking
    Run {
        #[command(flatten)]
        grid: GridArgs,
    },

    /// Resample daily prices to month-start observations
    Resample {
        /// Daily price table (defaults to the data directory)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Monthly price table (defaults to the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute equal- and cap-weighted benchmark indices
    Index {
        /// Number of trailing rows to print
        #[arg(short = 'n', long, default_value = "12")]
        tail: usize,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if std::env::var("RUST_LOG_FORMAT").is_ok_and(|f| f == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Factors { category, verbose } => {
            cmd::factors::list_factors(category.as_deref(), verbose);
        }
        Commands::Rank => {
            let config = load_config(&cli.global, None)?;
            cmd::rank::rank(&config)?;
        }
        Commands::Backtest { grid, format } => {
            let config = load_config(&cli.global, Some(&grid))?;
            cmd::backtest::backtest(&config, &format, grid.summary)?;
        }
        Commands::Run { grid } => {
            let config = load_config(&cli.global, Some(&grid))?;
            cmd::run::run(&config, grid.summary)?;
        }
        Commands::Resample { input, output } => {
            let config = load_config(&cli.global, None)?;
            cmd::resample::resample(&config, input, output)?;
        }
        Commands::Index { tail } => {
            let config = load_config(&cli.global, None)?;
            cmd::index::index(&config, tail)?;
        }
    }

    Ok(())
}

/// Configuration file, then environment, then command-line flags.
fn load_config(global: &GlobalArgs, grid: Option<&GridArgs>) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(global.config.as_deref())?;
    if let Some(dir) = &global.data_dir {
        config.data_dir.clone_from(dir);
    }
    if let Some(dir) = &global.output_dir {
        config.output_dir.clone_from(dir);
    }
    config.backup |= global.backup;

    if let Some(grid) = grid {
        if !grid.factors.is_empty() {
            config.backtest.rank_columns =
                grid.factors.iter().map(String::as_str).map(cmd::rank_column).collect();
        }
        if !grid.periods.is_empty() {
            config.backtest.holding_periods.clone_from(&grid.periods);
        }
    }
    Ok(config)
}
