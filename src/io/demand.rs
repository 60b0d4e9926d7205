// src/io/demand.rs

use crate::model::Product;
use crate::simulation::random::RandomSource;

/// Relative width of the uniform noise band around the expected demand (±10%).
pub const DEMAND_NOISE: f64 = 0.2;

/// Draws one day's demand around `expected`.
///
/// Noise is uniform in `[-0.1 * expected, +0.1 * expected)`; the result is
/// floored and clamped to zero. One value is always consumed from `rng`, so
/// zero-demand products do not shift the draw sequence of the others.
pub fn noisy_demand(expected: f64, rng: &mut dyn RandomSource) -> u32 {
    let noise = (rng.next_unit() - 0.5) * DEMAND_NOISE * expected;
    let value = (expected + noise).floor();

    if value <= 0.0 {
        0
    } else {
        value as u32
    }
}

/// Demand seeded by the day-indexed historical pattern (used by the learner).
pub fn pattern_demand(product: &Product, day: usize, rng: &mut dyn RandomSource) -> u32 {
    noisy_demand(product.pattern_demand(day) as f64, rng)
}

/// Demand seeded by the long-run historical average (used by the baseline).
pub fn average_demand(product: &Product, rng: &mut dyn RandomSource) -> u32 {
    noisy_demand(product.average_demand(), rng)
}
