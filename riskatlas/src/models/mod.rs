pub mod montecarlo;
pub mod randomwalk;
pub mod simulationpath;
pub mod traits;
