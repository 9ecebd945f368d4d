use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::debug;

use crate::models::randomwalk::RandomWalkModel;
use crate::models::simulationpath::{SimulationEnsemble, SimulationPath};
use crate::models::traits::StochasticModel;
use crate::returns::returnstatistics::ReturnStatistics;
use crate::utils::errors::{AtlasError, Result};

fn check_simulations(simulations: usize) -> Result<()> {
    if simulations == 0 {
        return Err(AtlasError::InvalidParameterErr(
            "number of simulations must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Generates `simulations` independent paths of `days` steps from `start_price`.
///
/// Paths are drawn one after the other from `rng`, so the ensemble is
/// reproducible for an identically seeded generator. Parameters are checked
/// before the first draw.
pub fn simulate<R: Rng + ?Sized>(
    start_price: f64,
    stats: &ReturnStatistics,
    days: usize,
    simulations: usize,
    rng: &mut R,
) -> Result<SimulationEnsemble> {
    check_simulations(simulations)?;
    let model = RandomWalkModel::new(start_price, stats, days)?;
    debug!(start_price, days, simulations, "simulating ensemble");
    let paths = (0..simulations)
        .map(|_| model.gen_path(&mut *rng))
        .collect::<Vec<SimulationPath>>();
    Ok(SimulationEnsemble::new(start_price, days, paths))
}

/// Parallel version of [`simulate`].
///
/// Each path gets its own `StdRng` seeded from `(seed, path index)`, so the
/// result depends only on `seed`, never on how rayon schedules the work. The
/// draws differ from those of [`simulate`] with `StdRng::seed_from_u64(seed)`.
pub fn par_simulate(
    start_price: f64,
    stats: &ReturnStatistics,
    days: usize,
    simulations: usize,
    seed: u64,
) -> Result<SimulationEnsemble> {
    check_simulations(simulations)?;
    let model = RandomWalkModel::new(start_price, stats, days)?;
    debug!(start_price, days, simulations, seed, "simulating ensemble in parallel");
    let paths = (0..simulations)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(stream_seed(seed, i as u64));
            model.gen_path(&mut rng)
        })
        .collect::<Vec<SimulationPath>>();
    Ok(SimulationEnsemble::new(start_price, days, paths))
}

/// SplitMix64 mix of the base seed and a stream index.
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed.wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
