use serde::{Deserialize, Serialize};

use crate::risk::riskmetrics::DEFAULT_RISK_FREE_RATE;
use crate::utils::errors::{AtlasError, Result};

pub const DEFAULT_DAYS: usize = 30;
pub const DEFAULT_SIMULATIONS: usize = 1000;
pub const DEFAULT_PORTFOLIO_SIMULATIONS: usize = 100;

/// Settings shared by single-instrument analyses and portfolio runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub days: usize,
    pub simulations: usize,
    /// Paths per instrument when valuing a portfolio.
    pub portfolio_simulations: usize,
    pub risk_free_rate: f64,
    /// Seed for reproducible runs; fresh entropy when unset.
    pub seed: Option<u64>,
    /// Spread paths over the rayon thread pool.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            simulations: DEFAULT_SIMULATIONS,
            portfolio_simulations: DEFAULT_PORTFOLIO_SIMULATIONS,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            seed: None,
            parallel: false,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.simulations == 0 {
            return Err(AtlasError::InvalidParameterErr(
                "simulations must be positive".to_string(),
            ));
        }
        if self.portfolio_simulations == 0 {
            return Err(AtlasError::InvalidParameterErr(
                "portfolio_simulations must be positive".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(AtlasError::InvalidParameterErr(format!(
                "risk_free_rate {} is not finite",
                self.risk_free_rate
            )));
        }
        Ok(())
    }
}
