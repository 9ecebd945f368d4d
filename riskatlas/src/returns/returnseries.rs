use serde::Serialize;

use crate::history::pricehistory::PriceHistory;
use crate::utils::errors::{AtlasError, Result};

/// Simple period-over-period returns of a [`PriceHistory`]. Element `i` is
/// `(close[i + 1] - close[i]) / close[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Wraps returns computed elsewhere.
    pub fn from_values(values: Vec<f64>) -> ReturnSeries {
        ReturnSeries { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TryFrom<&PriceHistory> for ReturnSeries {
    type Error = AtlasError;

    fn try_from(history: &PriceHistory) -> Result<Self> {
        compute_returns(history)
    }
}

pub fn compute_returns(history: &PriceHistory) -> Result<ReturnSeries> {
    if history.len() < 2 {
        return Err(AtlasError::InsufficientDataErr(format!(
            "at least 2 prices are needed to compute returns, got {}",
            history.len()
        )));
    }
    let values = history
        .records()
        .windows(2)
        .map(|w| (w[1].close() - w[0].close()) / w[0].close())
        .collect();
    Ok(ReturnSeries { values })
}
