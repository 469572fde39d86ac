//! Compensated accumulation and streaming moments.
//!
//! Probabilities are stored as `f64`. Every place that adds many of them
//! together (log-factorials, cumulative tails, sampler CDFs) goes through
//! the compensated summation here, so the summation step itself adds
//! only about one ulp regardless of the number of terms. Error already
//! present in the addends (e.g. table entries from `exp` of a log-domain
//! value) is carried through unchanged.
//!
//! # Algorithms
//!
//! - **Summation**: Neumaier's improved Kahan–Babuška algorithm.
//!   Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
//!   zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
//! - **Moments of simulated draws**: Welford's online update.

/// Neumaier compensated sum of a slice.
///
/// Handles the case where the addend is larger in magnitude than the
/// running sum, which plain Kahan summation loses.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Examples
/// ```
/// use u_binomial::stats::kahan_sum;
/// let v = [1.0, 1e100, 1.0, -1e100];
/// assert_eq!(kahan_sum(&v), 2.0);
/// ```
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut acc = CompensatedSum::new();
    for &x in data {
        acc.add(x);
    }
    acc.total()
}

/// Streaming form of [`kahan_sum`].
///
/// Used where partial sums are needed as they are produced, e.g. the
/// running `ln k!` table and the sampler's cumulative table.
///
/// # Examples
/// ```
/// use u_binomial::stats::CompensatedSum;
/// let mut acc = CompensatedSum::new();
/// for _ in 0..10 {
///     acc.add(0.1);
/// }
/// assert_eq!(acc.total(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensatedSum {
    sum: f64,
    c: f64,
}

impl CompensatedSum {
    /// Creates an empty sum.
    pub fn new() -> Self {
        Self { sum: 0.0, c: 0.0 }
    }

    /// Adds `x`, folding the lost low-order bits into the compensation.
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.c += (self.sum - t) + x;
        } else {
            self.c += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Current compensated total.
    pub fn total(&self) -> f64 {
        self.sum + self.c
    }
}

/// Running mean and population variance of integer draws (Welford).
///
/// Keeps the mean and the sum of squared deviations so that large
/// simulations never form `E[X²] − (E[X])²`.
///
/// ```
/// use u_binomial::stats::DrawMoments;
/// let mut m = DrawMoments::default();
/// for x in [2, 4, 4, 4, 5, 5, 7, 9] {
///     m.push(x);
/// }
/// assert_eq!(m.mean(), 5.0);
/// assert!((m.variance() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawMoments {
    draws: u64,
    mean: f64,
    sq_dev: f64,
}

impl DrawMoments {
    pub fn push(&mut self, x: u64) {
        let x = x as f64;
        self.draws += 1;
        let before = x - self.mean;
        self.mean += before / self.draws as f64;
        self.sq_dev += before * (x - self.mean);
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Zero before the first draw.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance; zero before the first draw.
    pub fn variance(&self) -> f64 {
        if self.draws == 0 {
            0.0
        } else {
            self.sq_dev / self.draws as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- compensated summation ---

    #[test]
    fn test_kahan_sum_empty() {
        assert_eq!(kahan_sum(&[]), 0.0);
    }

    #[test]
    fn test_kahan_sum_recovers_small_terms() {
        // Naive summation returns 0.0 here.
        let v = [1.0, 1e100, 1.0, -1e100];
        assert_eq!(kahan_sum(&v), 2.0);
    }

    #[test]
    fn test_kahan_sum_tenths() {
        let v = [0.1; 10];
        let naive: f64 = v.iter().sum();
        assert_ne!(naive, 1.0);
        assert_eq!(kahan_sum(&v), 1.0);
    }

    #[test]
    fn test_compensated_sum_matches_slice_sum() {
        let v: Vec<f64> = (1..=1000).map(|i| 1.0 / i as f64).collect();
        let mut acc = CompensatedSum::new();
        for &x in &v {
            acc.add(x);
        }
        assert_eq!(acc.total(), kahan_sum(&v));
    }

    #[test]
    fn test_compensated_sum_many_small_probabilities() {
        // 1e6 equal masses of 1e-6 should add up to one.
        let mut acc = CompensatedSum::new();
        for _ in 0..1_000_000 {
            acc.add(1e-6);
        }
        assert!((acc.total() - 1.0).abs() < 1e-15);
    }

    // --- draw moments ---

    #[test]
    fn test_moments_without_draws() {
        let m = DrawMoments::default();
        assert_eq!(m.draws(), 0);
        assert_eq!(m.mean(), 0.0);
        assert_eq!(m.variance(), 0.0);
    }

    #[test]
    fn test_moments_constant_draws() {
        let mut m = DrawMoments::default();
        for _ in 0..50 {
            m.push(3);
        }
        assert_eq!(m.draws(), 50);
        assert_eq!(m.mean(), 3.0);
        assert_eq!(m.variance(), 0.0);
    }

    #[test]
    fn test_moments_far_from_zero() {
        let mut m = DrawMoments::default();
        for x in 1_000_000_001..=1_000_000_005_u64 {
            m.push(x);
        }
        assert!((m.mean() - 1_000_000_003.0).abs() < 1e-6);
        assert!((m.variance() - 2.0).abs() < 1e-6, "got {}", m.variance());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn kahan_sum_close_to_exact_integer_sum(
            data in proptest::collection::vec(-1_000_000_i64..1_000_000, 0..200),
        ) {
            let exact: i64 = data.iter().sum();
            let floats: Vec<f64> = data.iter().map(|&x| x as f64).collect();
            prop_assert_eq!(kahan_sum(&floats), exact as f64);
        }

        #[test]
        fn moments_match_two_pass(
            data in proptest::collection::vec(0_u64..1_000, 1..200),
        ) {
            let mut m = DrawMoments::default();
            for &x in &data {
                m.push(x);
            }
            let n = data.len() as f64;
            let mean = data.iter().map(|&x| x as f64).sum::<f64>() / n;
            let var = data.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / n;
            prop_assert!((m.mean() - mean).abs() < 1e-9);
            prop_assert!((m.variance() - var).abs() < 1e-6 * var.max(1.0));
            prop_assert!(m.variance() >= 0.0);
        }
    }
}
