//! Monte Carlo price-path simulation and risk metrics for a single
//! instrument's daily closes.
//!
//! The pipeline is [`returns`] → [`models`] → [`risk`]; [`analysis`] chains the
//! three over a [`history::pricehistory::PriceHistory`] and [`portfolio`] sums
//! independent per-instrument runs.

pub mod analysis;
pub mod history;
pub mod models;
pub mod portfolio;
pub mod prelude;
pub mod returns;
pub mod risk;
pub mod time;
pub mod utils;
