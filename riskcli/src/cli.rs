use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "riskcli", version, about = "Monte Carlo price simulation and risk metrics")]
pub struct Cli {
    /// JSON file with analysis settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simulate future price paths for one symbol
    Simulate(InstrumentArgs),
    /// Simulate and report VaR, expected value and Sharpe ratio
    Risk(InstrumentArgs),
    /// Value a set of positions with independent simulations
    Portfolio(PortfolioArgs),
    /// Serve the JSON simulation API over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Horizon in days
    #[arg(long)]
    pub days: Option<usize>,
    /// Seed for reproducible paths
    #[arg(long)]
    pub seed: Option<u64>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct InstrumentArgs {
    /// JSON price file mapping symbols to daily closes
    #[arg(long)]
    pub data: PathBuf,
    #[arg(long, default_value = "AAPL")]
    pub symbol: String,
    /// Number of paths
    #[arg(long)]
    pub simulations: Option<usize>,
    #[arg(long)]
    pub risk_free_rate: Option<f64>,
    /// Spread paths over all cores
    #[arg(long)]
    pub parallel: bool,
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Clone, Args)]
pub struct PortfolioArgs {
    #[arg(long)]
    pub data: PathBuf,
    /// Position as SYMBOL=QUANTITY, repeatable
    #[arg(long = "position", value_name = "SYMBOL=QTY", required = true)]
    pub positions: Vec<String>,
    /// Paths per symbol
    #[arg(long)]
    pub simulations: Option<usize>,
    #[command(flatten)]
    pub run: RunArgs,
}
