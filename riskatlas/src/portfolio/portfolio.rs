use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::riskanalysis::RiskAnalysis;
use crate::history::pricestore::{normalize_symbol, PriceStore};
use crate::models::montecarlo::stream_seed;
use crate::utils::errors::{AtlasError, Result};

/// Holding of `quantity` shares of `symbol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
}

impl Position {
    pub fn new(symbol: &str, quantity: f64) -> Result<Position> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(AtlasError::InvalidParameterErr(format!(
                "quantity of {} must be a non-negative number, got {}",
                symbol, quantity
            )));
        }
        Ok(Position {
            symbol: normalize_symbol(symbol),
            quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionValuation {
    pub symbol: String,
    pub quantity: f64,
    pub initial_price: f64,
    pub predicted_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub positions: Vec<PositionValuation>,
    /// Symbols with no usable history, left out of the totals.
    pub skipped: Vec<String>,
    pub total_initial: f64,
    pub total_predicted: f64,
    pub overall_return_pct: f64,
}

/// Values each position with its own independent simulation and sums the
/// results. Instruments are treated as uncorrelated.
///
/// The initial value of a position is `quantity * last close`; its predicted
/// value is `quantity * mean terminal price` over
/// `config.portfolio_simulations` paths of `config.days` steps.
pub fn evaluate_portfolio(
    store: &PriceStore,
    positions: &[Position],
    config: &AnalysisConfig,
) -> Result<PortfolioReport> {
    config.validate()?;
    for position in positions {
        if !position.quantity.is_finite() || position.quantity < 0.0 {
            return Err(AtlasError::InvalidParameterErr(format!(
                "quantity of {} must be a non-negative number, got {}",
                position.symbol, position.quantity
            )));
        }
    }

    let mut valuations = Vec::with_capacity(positions.len());
    let mut skipped = Vec::new();
    let mut total_initial = 0.0;
    let mut total_predicted = 0.0;

    for (i, position) in positions.iter().enumerate() {
        let history = match store.get_history(&position.symbol) {
            Ok(history) => history,
            Err(e) => {
                warn!(symbol = %position.symbol, error = %e, "skipping position");
                skipped.push(position.symbol.clone());
                continue;
            }
        };

        let mut analysis_config = AnalysisConfig {
            simulations: config.portfolio_simulations,
            ..config.clone()
        };
        analysis_config.seed = config.seed.map(|seed| stream_seed(seed, i as u64));
        let analysis = RiskAnalysis::new().with_config(analysis_config);

        let (initial_price, ensemble) = match history
            .last_close()
            .and_then(|close| analysis.simulate(history).map(|(_, ensemble)| (close, ensemble)))
        {
            Ok(result) => result,
            Err(AtlasError::InsufficientDataErr(msg)) => {
                warn!(symbol = %position.symbol, reason = %msg, "skipping position");
                skipped.push(position.symbol.clone());
                continue;
            }
            Err(e) => return Err(e),
        };

        let predicted_price = ensemble.average_terminal_price();
        total_initial += position.quantity * initial_price;
        total_predicted += position.quantity * predicted_price;
        valuations.push(PositionValuation {
            symbol: position.symbol.clone(),
            quantity: position.quantity,
            initial_price,
            predicted_price,
        });
    }

    if total_initial == 0.0 {
        return Err(AtlasError::InsufficientDataErr(
            "no valid data for portfolio calculation".to_string(),
        ));
    }

    let overall_return_pct = (total_predicted - total_initial) / total_initial * 100.0;
    Ok(PortfolioReport {
        positions: valuations,
        skipped,
        total_initial,
        total_predicted,
        overall_return_pct,
    })
}
