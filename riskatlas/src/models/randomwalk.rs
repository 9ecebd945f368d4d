use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::models::simulationpath::SimulationPath;
use crate::models::traits::StochasticModel;
use crate::returns::returnstatistics::ReturnStatistics;
use crate::utils::errors::{AtlasError, Result};

/// Multiplicative random walk: every step multiplies the price by `1 + r`
/// with `r ~ Normal(mean_return, dispersion)`.
#[derive(Debug, Clone, Copy)]
pub struct RandomWalkModel {
    start_price: f64,
    days: usize,
    shock: Normal<f64>,
}

impl RandomWalkModel {
    pub fn new(start_price: f64, stats: &ReturnStatistics, days: usize) -> Result<Self> {
        if !start_price.is_finite() || start_price <= 0.0 {
            return Err(AtlasError::InvalidParameterErr(format!(
                "start price must be a positive number, got {}",
                start_price
            )));
        }
        if days == usize::MAX {
            return Err(AtlasError::InvalidParameterErr(format!(
                "horizon of {} days is too long",
                days
            )));
        }
        let shock = Normal::new(stats.mean_return(), stats.dispersion())
            .map_err(|e| AtlasError::InvalidParameterErr(e.to_string()))?;
        Ok(Self {
            start_price,
            days,
            shock,
        })
    }
}

impl StochasticModel for RandomWalkModel {
    fn gen_path<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationPath {
        let mut prices = Vec::with_capacity(self.days + 1);
        let mut price = self.start_price;
        prices.push(price);
        for _ in 0..self.days {
            let r = self.shock.sample(rng);
            price *= 1.0 + r;
            prices.push(price);
        }
        SimulationPath::new(prices)
    }
}
