use rand::{rngs::StdRng, Rng, SeedableRng};

pub const SEED: u64 = 0xfbdc_4ea0_30de_82ba;

/// Side of the square containing the generated points
pub const SIZE: f64 = 1000.;

/// Uniformly distributed points, at least 1 unit away from the sides of the square
pub fn uniform_points(count: usize, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| [rng.gen_range(1.0..SIZE - 1.), rng.gen_range(1.0..SIZE - 1.)])
        .collect()
}
