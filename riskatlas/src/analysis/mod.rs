pub mod config;
pub mod riskanalysis;
