use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::returns::returnseries::ReturnSeries;
use crate::utils::errors::{AtlasError, Result};

/// Drift and scale fed to the path simulator.
///
/// `dispersion` is half the range of the returns, `(max - min) / 2`, not their
/// standard deviation. It is used as the standard deviation of the daily shock,
/// so changing it changes the width of every simulated ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatistics {
    mean_return: f64,
    dispersion: f64,
}

impl ReturnStatistics {
    pub fn new(mean_return: f64, dispersion: f64) -> Result<ReturnStatistics> {
        if !mean_return.is_finite() {
            return Err(AtlasError::InvalidParameterErr(format!(
                "mean return must be finite, got {}",
                mean_return
            )));
        }
        if !dispersion.is_finite() || dispersion < 0.0 {
            return Err(AtlasError::InvalidParameterErr(format!(
                "dispersion must be a non-negative number, got {}",
                dispersion
            )));
        }
        Ok(ReturnStatistics {
            mean_return,
            dispersion,
        })
    }

    pub fn mean_return(&self) -> f64 {
        self.mean_return
    }

    pub fn dispersion(&self) -> f64 {
        self.dispersion
    }
}

pub fn compute_statistics(returns: &ReturnSeries) -> Result<ReturnStatistics> {
    if returns.is_empty() {
        return Err(AtlasError::InsufficientDataErr(
            "return series is empty".to_string(),
        ));
    }
    let values = returns.values();
    let mean_return = values.iter().mean();
    let max = Statistics::max(values.iter());
    let min = Statistics::min(values.iter());
    let dispersion = if max == min { 0.0 } else { (max - min) / 2.0 };
    ReturnStatistics::new(mean_return, dispersion)
}
