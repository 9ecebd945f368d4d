use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::utils::errors::{AtlasError, Result};

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

/// Lower-tail probability of the value-at-risk quantile.
const VAR_TAIL: f64 = 0.05;

/// Summary of a simulated terminal price distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    value_at_risk_95: f64,
    expected_return: f64,
    sharpe_ratio: f64,
    volatility: f64,
}

impl RiskMetrics {
    /// Empirical 5th percentile of the terminal prices, taken at sorted index
    /// `floor(0.05 * n)` without interpolation. For fewer than 20 samples this
    /// is the minimum.
    pub fn value_at_risk_95(&self) -> f64 {
        self.value_at_risk_95
    }

    /// Mean terminal price.
    pub fn expected_return(&self) -> f64 {
        self.expected_return
    }

    /// `(expected_return - risk_free_rate) / volatility`, or 0 for a
    /// distribution with no spread.
    pub fn sharpe_ratio(&self) -> f64 {
        self.sharpe_ratio
    }

    /// Population standard deviation of the terminal prices.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

pub fn compute_risk_metrics(terminal_prices: &[f64], risk_free_rate: f64) -> Result<RiskMetrics> {
    if terminal_prices.is_empty() {
        return Err(AtlasError::InvalidParameterErr(
            "terminal prices are empty".to_string(),
        ));
    }
    if let Some(p) = terminal_prices.iter().find(|p| !p.is_finite()) {
        return Err(AtlasError::InvalidParameterErr(format!(
            "terminal price {} is not finite",
            p
        )));
    }
    if !risk_free_rate.is_finite() {
        return Err(AtlasError::InvalidParameterErr(format!(
            "risk free rate {} is not finite",
            risk_free_rate
        )));
    }

    let mut sorted = terminal_prices.to_vec();
    sorted.sort_by(f64::total_cmp);
    let index = (VAR_TAIL * sorted.len() as f64) as usize;
    let value_at_risk_95 = sorted[index];

    // single-pass variance leaves rounding noise on identical prices
    if sorted[0] == sorted[sorted.len() - 1] {
        return Ok(RiskMetrics {
            value_at_risk_95,
            expected_return: sorted[0],
            sharpe_ratio: 0.0,
            volatility: 0.0,
        });
    }

    let expected_return = terminal_prices.iter().mean();
    let volatility = terminal_prices.iter().population_std_dev();
    let sharpe_ratio = if volatility != 0.0 {
        (expected_return - risk_free_rate) / volatility
    } else {
        0.0
    };

    Ok(RiskMetrics {
        value_at_risk_95,
        expected_return,
        sharpe_ratio,
        volatility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_prices() -> Result<()> {
        let metrics = compute_risk_metrics(&[110.0, 95.0, 100.0, 90.0, 105.0], DEFAULT_RISK_FREE_RATE)?;
        assert!((metrics.expected_return() - 100.0).abs() < 1e-12);
        assert_eq!(metrics.value_at_risk_95(), 90.0);
        assert!((metrics.volatility() - 50f64.sqrt()).abs() < 1e-12);
        let sharpe = (100.0 - 0.01) / 50f64.sqrt();
        assert!((metrics.sharpe_ratio() - sharpe).abs() < 1e-9);
        assert!((metrics.sharpe_ratio() - 14.14).abs() < 0.01);
        Ok(())
    }

    #[test]
    fn test_identical_prices_have_zero_sharpe() -> Result<()> {
        let metrics = compute_risk_metrics(&[100.0; 12], DEFAULT_RISK_FREE_RATE)?;
        assert_eq!(metrics.volatility(), 0.0);
        assert_eq!(metrics.sharpe_ratio(), 0.0);
        assert_eq!(metrics.expected_return(), 100.0);
        assert_eq!(metrics.value_at_risk_95(), 100.0);
        Ok(())
    }

    #[test]
    fn test_identical_inexact_prices_have_zero_sharpe() -> Result<()> {
        for prices in [vec![101.2; 1000], vec![0.1; 10], vec![1.0 / 3.0; 7]] {
            let metrics = compute_risk_metrics(&prices, DEFAULT_RISK_FREE_RATE)?;
            assert_eq!(metrics.volatility(), 0.0);
            assert_eq!(metrics.sharpe_ratio(), 0.0);
            assert_eq!(metrics.expected_return(), prices[0]);
            assert_eq!(metrics.value_at_risk_95(), prices[0]);
        }
        Ok(())
    }

    #[test]
    fn test_var_index_moves_with_sample_size() -> Result<()> {
        // floor(0.05 * 40) = 2
        let prices: Vec<f64> = (1..=40).rev().map(|p| p as f64).collect();
        let metrics = compute_risk_metrics(&prices, 0.0)?;
        assert_eq!(metrics.value_at_risk_95(), 3.0);

        // floor(0.05 * 19) = 0
        let prices: Vec<f64> = (1..=19).map(|p| p as f64 * 2.0).collect();
        let metrics = compute_risk_metrics(&prices, 0.0)?;
        assert_eq!(metrics.value_at_risk_95(), 2.0);
        Ok(())
    }

    #[test]
    fn test_single_price() -> Result<()> {
        let metrics = compute_risk_metrics(&[42.0], DEFAULT_RISK_FREE_RATE)?;
        assert_eq!(metrics.value_at_risk_95(), 42.0);
        assert_eq!(metrics.sharpe_ratio(), 0.0);
        Ok(())
    }

    #[test]
    fn test_empty_prices() {
        let result = compute_risk_metrics(&[], DEFAULT_RISK_FREE_RATE);
        assert!(matches!(result, Err(AtlasError::InvalidParameterErr(_))));
    }

    #[test]
    fn test_non_finite_prices() {
        let result = compute_risk_metrics(&[1.0, f64::NAN], DEFAULT_RISK_FREE_RATE);
        assert!(matches!(result, Err(AtlasError::InvalidParameterErr(_))));
    }
}
