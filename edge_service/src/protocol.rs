use std::collections::BTreeMap;

use riskatlas::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub history: PriceHistory,
    #[serde(default)]
    pub days: Option<usize>,
    #[serde(default)]
    pub simulations: Option<usize>,
    #[serde(default)]
    pub risk_free_rate: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub parallel: bool,
    /// Return every path, not only the terminal prices.
    #[serde(default)]
    pub include_paths: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub statistics: ReturnStatistics,
    pub metrics: RiskMetrics,
    pub start_price: f64,
    pub days: usize,
    pub terminal_prices: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<SimulationPath>>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioRequest {
    pub histories: BTreeMap<String, PriceHistory>,
    pub positions: Vec<Position>,
    #[serde(default)]
    pub days: Option<usize>,
    #[serde(default)]
    pub simulations: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl SimulationRequest {
    pub fn config(&self) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        AnalysisConfig {
            days: self.days.unwrap_or(defaults.days),
            simulations: self.simulations.unwrap_or(defaults.simulations),
            risk_free_rate: self.risk_free_rate.unwrap_or(defaults.risk_free_rate),
            seed: self.seed,
            parallel: self.parallel,
            ..defaults
        }
    }
}

impl PortfolioRequest {
    pub fn config(&self) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        AnalysisConfig {
            days: self.days.unwrap_or(defaults.days),
            portfolio_simulations: self
                .simulations
                .unwrap_or(defaults.portfolio_simulations),
            seed: self.seed,
            ..defaults
        }
    }

    pub fn store(&self) -> Result<PriceStore> {
        PriceStore::try_from(self.histories.clone())
    }
}
