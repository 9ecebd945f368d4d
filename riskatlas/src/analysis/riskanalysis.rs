use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::analysis::config::AnalysisConfig;
use crate::history::pricehistory::PriceHistory;
use crate::models::montecarlo::{par_simulate, simulate};
use crate::models::simulationpath::SimulationEnsemble;
use crate::returns::returnseries::compute_returns;
use crate::returns::returnstatistics::{compute_statistics, ReturnStatistics};
use crate::risk::riskmetrics::{compute_risk_metrics, RiskMetrics};
use crate::utils::errors::Result;

/// Output of a full run over one price history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub statistics: ReturnStatistics,
    pub ensemble: SimulationEnsemble,
    pub metrics: RiskMetrics,
}

/// Runs returns → statistics → simulation → risk metrics for one instrument,
/// starting the paths at the last close of the history.
#[derive(Debug, Clone, Default)]
pub struct RiskAnalysis {
    config: AnalysisConfig,
}

impl RiskAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.config.days = days;
        self
    }

    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.config.simulations = simulations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.config.risk_free_rate = risk_free_rate;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Simulates from the last close without computing metrics.
    pub fn simulate(&self, history: &PriceHistory) -> Result<(ReturnStatistics, SimulationEnsemble)> {
        self.config.validate()?;
        let returns = compute_returns(history)?;
        let statistics = compute_statistics(&returns)?;
        let start_price = history.last_close()?;
        debug!(
            mean_return = statistics.mean_return(),
            dispersion = statistics.dispersion(),
            start_price,
            "return statistics"
        );
        let days = self.config.days;
        let simulations = self.config.simulations;
        let ensemble = match (self.config.parallel, self.config.seed) {
            (true, Some(seed)) => par_simulate(start_price, &statistics, days, simulations, seed)?,
            (true, None) => {
                let seed = rand::random::<u64>();
                par_simulate(start_price, &statistics, days, simulations, seed)?
            }
            (false, Some(seed)) => {
                let mut rng = StdRng::seed_from_u64(seed);
                simulate(start_price, &statistics, days, simulations, &mut rng)?
            }
            (false, None) => {
                let mut rng = StdRng::from_entropy();
                simulate(start_price, &statistics, days, simulations, &mut rng)?
            }
        };
        Ok((statistics, ensemble))
    }

    pub fn run(&self, history: &PriceHistory) -> Result<AnalysisResult> {
        let (statistics, ensemble) = self.simulate(history)?;
        let metrics = compute_risk_metrics(&ensemble.terminal_prices(), self.config.risk_free_rate)?;
        Ok(AnalysisResult {
            statistics,
            ensemble,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::date::Date;
    use crate::utils::errors::AtlasError;

    fn history(closes: &[f64]) -> PriceHistory {
        PriceHistory::from_closes(
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| (Date::new(2024, 2, 1 + i as u32), *c)),
        )
        .unwrap()
    }

    #[test]
    fn test_run_is_reproducible_with_seed() -> Result<()> {
        let h = history(&[100.0, 101.0, 99.0, 102.0, 103.5, 101.2]);
        let analysis = RiskAnalysis::new().with_days(15).with_simulations(300).with_seed(8);
        let a = analysis.run(&h)?;
        let b = analysis.run(&h)?;
        assert_eq!(a, b);
        assert_eq!(a.ensemble.start_price(), 101.2);
        assert_eq!(a.ensemble.len(), 300);
        assert!(a.ensemble.paths().iter().all(|p| p.len() == 16));
        Ok(())
    }

    #[test]
    fn test_parallel_run_is_reproducible_with_seed() -> Result<()> {
        let h = history(&[50.0, 51.0, 49.5, 50.5]);
        let analysis = RiskAnalysis::new()
            .with_days(5)
            .with_simulations(64)
            .with_seed(21)
            .with_parallel(true);
        assert_eq!(analysis.run(&h)?, analysis.run(&h)?);
        Ok(())
    }

    #[test]
    fn test_flat_history_is_degenerate() -> Result<()> {
        let h = history(&[20.0, 20.0, 20.0]);
        let result = RiskAnalysis::new().with_days(10).with_simulations(5).run(&h)?;
        assert_eq!(result.statistics.dispersion(), 0.0);
        assert_eq!(result.metrics.expected_return(), 20.0);
        assert_eq!(result.metrics.volatility(), 0.0);
        assert_eq!(result.metrics.sharpe_ratio(), 0.0);
        Ok(())
    }

    #[test]
    fn test_flat_inexact_history_has_zero_sharpe() -> Result<()> {
        let h = history(&[101.2, 101.2, 101.2, 101.2]);
        let result = RiskAnalysis::new().with_seed(1).run(&h)?;
        assert_eq!(result.statistics.dispersion(), 0.0);
        assert!(result.ensemble.terminal_prices().iter().all(|p| *p == 101.2));
        assert_eq!(result.metrics.volatility(), 0.0);
        assert_eq!(result.metrics.sharpe_ratio(), 0.0);
        Ok(())
    }

    #[test]
    fn test_short_history() {
        let result = RiskAnalysis::new().run(&history(&[20.0]));
        assert!(matches!(result, Err(AtlasError::InsufficientDataErr(_))));
    }

    #[test]
    fn test_zero_simulations() {
        let result = RiskAnalysis::new()
            .with_simulations(0)
            .run(&history(&[20.0, 21.0]));
        assert!(matches!(result, Err(AtlasError::InvalidParameterErr(_))));
    }
}
