use rand::Rng;

use crate::models::simulationpath::SimulationPath;

/// Trait for models capable of generating Monte Carlo price paths.
pub trait StochasticModel {
    /// Generate one path, drawing every shock from `rng` in time order.
    fn gen_path<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationPath;
}
