use std::path::Path;

use anyhow::{Context, Result};
use riskatlas::prelude::AnalysisConfig;
use tracing::warn;

use crate::cli::{InstrumentArgs, PortfolioArgs, RunArgs};

pub const ENV_PREFIX: &str = "RISKATLAS_";

/// Reads settings from `path` when given, defaults otherwise.
pub fn load_file(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let key = format!("{}{}", ENV_PREFIX, name);
    let raw = lookup(&key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = %key, value = %raw, "ignoring malformed environment variable");
            None
        }
    }
}

/// Overrides settings from `RISKATLAS_*` variables resolved through `lookup`.
pub fn apply_env(
    mut config: AnalysisConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AnalysisConfig {
    if let Some(days) = parse_var(&lookup, "DAYS") {
        config.days = days;
    }
    if let Some(simulations) = parse_var(&lookup, "SIMULATIONS") {
        config.simulations = simulations;
    }
    if let Some(simulations) = parse_var(&lookup, "PORTFOLIO_SIMULATIONS") {
        config.portfolio_simulations = simulations;
    }
    if let Some(rate) = parse_var(&lookup, "RISK_FREE_RATE") {
        config.risk_free_rate = rate;
    }
    if let Some(seed) = parse_var(&lookup, "SEED") {
        config.seed = Some(seed);
    }
    if let Some(parallel) = parse_var(&lookup, "PARALLEL") {
        config.parallel = parallel;
    }
    config
}

fn apply_run(config: &mut AnalysisConfig, run: &RunArgs) {
    if let Some(days) = run.days {
        config.days = days;
    }
    if let Some(seed) = run.seed {
        config.seed = Some(seed);
    }
}

pub fn for_instrument(mut config: AnalysisConfig, args: &InstrumentArgs) -> AnalysisConfig {
    apply_run(&mut config, &args.run);
    if let Some(simulations) = args.simulations {
        config.simulations = simulations;
    }
    if let Some(rate) = args.risk_free_rate {
        config.risk_free_rate = rate;
    }
    config.parallel |= args.parallel;
    config
}

pub fn for_portfolio(mut config: AnalysisConfig, args: &PortfolioArgs) -> AnalysisConfig {
    apply_run(&mut config, &args.run);
    if let Some(simulations) = args.simulations {
        config.portfolio_simulations = simulations;
    }
    config
}
