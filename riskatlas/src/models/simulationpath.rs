use serde::Serialize;
use statrs::statistics::Statistics;

/// One simulated trajectory. Element 0 is the known starting price.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SimulationPath {
    prices: Vec<f64>,
}

impl SimulationPath {
    pub(crate) fn new(prices: Vec<f64>) -> Self {
        Self { prices }
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn start_price(&self) -> f64 {
        self.prices[0]
    }

    pub fn terminal_price(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Independent paths sharing a starting price, horizon and return statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationEnsemble {
    start_price: f64,
    days: usize,
    paths: Vec<SimulationPath>,
}

impl SimulationEnsemble {
    pub(crate) fn new(start_price: f64, days: usize, paths: Vec<SimulationPath>) -> Self {
        Self {
            start_price,
            days,
            paths,
        }
    }

    pub fn start_price(&self) -> f64 {
        self.start_price
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn paths(&self) -> &[SimulationPath] {
        &self.paths
    }

    pub fn terminal_prices(&self) -> Vec<f64> {
        self.paths.iter().map(|p| p.terminal_price()).collect()
    }

    pub fn average_terminal_price(&self) -> f64 {
        self.terminal_prices().mean()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_paths(self) -> Vec<SimulationPath> {
        self.paths
    }
}
