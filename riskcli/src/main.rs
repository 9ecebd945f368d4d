use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;

use cli::{Cli, Command};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let base = config::apply_env(
        config::load_file(cli.config.as_deref())?,
        |key| std::env::var(key).ok(),
    );

    let output = match cli.command {
        Command::Simulate(args) => {
            let config = config::for_instrument(base, &args);
            let store = commands::load_store(&args.data)?;
            commands::simulate(&store, &args.symbol, &config, args.run.json)?
        }
        Command::Risk(args) => {
            let config = config::for_instrument(base, &args);
            let store = commands::load_store(&args.data)?;
            commands::risk(&store, &args.symbol, &config, args.run.json)?
        }
        Command::Portfolio(args) => {
            let config = config::for_portfolio(base, &args);
            let store = commands::load_store(&args.data)?;
            let positions = args
                .positions
                .iter()
                .map(|p| commands::parse_position(p))
                .collect::<Result<Vec<_>>>()?;
            commands::portfolio(&store, &positions, &config, args.run.json)?
        }
        Command::Serve { addr } => {
            info!("Starting edge service v{}", env!("CARGO_PKG_VERSION"));
            edge_service::serve(&addr)?;
            return Ok(());
        }
    };
    println!("{}", output);
    Ok(())
}
