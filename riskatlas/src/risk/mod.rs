pub mod riskmetrics;
