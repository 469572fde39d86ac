//! Seeded sampling from a probability table.
//!
//! Lets the calculator draw simulated outcomes and compare empirical
//! frequencies and moments with the theoretical ones.
//!
//! # Reproducibility
//!
//! For reproducible runs, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::binomial::Binomial;
use crate::error::{BinomialError, Result};
use crate::stats::{CompensatedSum, DrawMoments};

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_binomial::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Inverse-CDF sampler over a distribution's probability table.
///
/// # Algorithm
/// Builds the cumulative table once with compensated summation, then
/// draws `u ~ U[0, total)` and returns the first `x` whose cumulative
/// mass exceeds `u`. Zero-mass outcomes are never returned.
///
/// # Complexity
/// - Construction: O(n)
/// - Sampling: O(log n)
///
/// # Examples
/// ```
/// use u_binomial::Binomial;
/// use u_binomial::random::{create_rng, TableSampler};
/// let b = Binomial::new(10, 0.5).unwrap();
/// let sampler = TableSampler::new(&b);
/// let mut rng = create_rng(42);
/// assert!(sampler.sample(&mut rng) <= 10);
/// ```
#[derive(Debug, Clone)]
pub struct TableSampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl TableSampler {
    pub fn new(dist: &Binomial) -> Self {
        let mut acc = CompensatedSum::new();
        let cumulative: Vec<f64> = dist
            .probabilities()
            .iter()
            .map(|&p| {
                acc.add(p);
                acc.total()
            })
            .collect();
        Self {
            cumulative,
            total: acc.total(),
        }
    }

    /// Draws one outcome `x` in `[0, n]`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u64 {
        let threshold = rng.random_range(0.0..self.total);
        let idx = self.cumulative.partition_point(|&c| c <= threshold);
        // Rounding can leave threshold at the very top of the table.
        idx.min(self.cumulative.len() - 1) as u64
    }

    /// Number of outcomes, `n + 1`.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Always false: a table has at least the `x = 0` row.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }
}

/// Result of [`simulate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub draws: u64,
    /// `counts[x]` is how many draws landed on `x`.
    pub counts: Vec<u64>,
    pub mean: f64,
    /// Population variance of the draws.
    pub variance: f64,
}

impl Simulation {
    /// Empirical Pr(X = x); zero outside the table.
    pub fn frequency(&self, x: usize) -> f64 {
        self.counts
            .get(x)
            .map_or(0.0, |&c| c as f64 / self.draws as f64)
    }
}

/// Draws `draws` outcomes from `dist` and tallies them.
///
/// # Errors
/// [`BinomialError::InvalidArgument`] if `draws == 0`.
pub fn simulate<R: Rng>(dist: &Binomial, draws: u64, rng: &mut R) -> Result<Simulation> {
    if draws == 0 {
        return Err(BinomialError::InvalidArgument(
            "number of draws must be positive".into(),
        ));
    }
    let sampler = TableSampler::new(dist);
    let mut counts = vec![0_u64; sampler.len()];
    let mut moments = DrawMoments::default();
    for _ in 0..draws {
        let x = sampler.sample(rng);
        counts[x as usize] += 1;
        moments.push(x);
    }
    debug!(n = dist.n(), pi = dist.pi(), draws, "simulation finished");
    Ok(Simulation {
        draws,
        counts,
        mean: moments.mean(),
        variance: moments.variance(),
    })
}

// ============================================================================
// Tests
// ============================================================================
