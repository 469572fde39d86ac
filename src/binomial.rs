//! Binomial distribution engine.
//!
//! [`Binomial`] owns `(n, pi)` and the probability table
//! `Pr(X = x)` for every `x` in `[0, n]`. The table is computed eagerly
//! and replaced wholesale whenever `n` or `pi` changes; all tail queries
//! read from it.
//!
//! # Queries
//!
//! | Method | Meaning | Range of `x` |
//! |---|---|---|
//! | [`Binomial::point_probability`] | Pr(X = x) | `[0, n]`, else [`BinomialError::OutOfRange`] |
//! | [`Binomial::less_or_equal`] | Pr(X ≤ x) | any, clamped to `[0, n]` |
//! | [`Binomial::less_than`] | Pr(X < x) | any, clamped to `[0, n]` |
//! | [`Binomial::greater_or_equal`] | 1 − Pr(X < x) | any |
//! | [`Binomial::greater_than`] | 1 − Pr(X ≤ x) | any |
//!
//! Cumulative queries never fail: `x < 0` is an empty sum and `x ≥ n`
//! covers the whole table. Only the point query validates its argument.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

use crate::error::{BinomialError, Result};
use crate::special::{ln_choose, ln_factorials};
use crate::stats::kahan_sum;

/// Largest accepted trial count. Keeps the table and its log-factorial
/// scratch space at a few megabytes each.
pub const MAX_TRIALS: u64 = 1_000_000;

/// Checks a caller-supplied trial count.
///
/// # Errors
/// [`BinomialError::InvalidArgument`] if `n < 0` or `n > MAX_TRIALS`.
pub fn validate_trials(n: i64) -> Result<u64> {
    if n < 0 {
        return Err(BinomialError::InvalidArgument(format!(
            "n must be a non-negative whole number, got {n}"
        )));
    }
    let n = n as u64;
    if n > MAX_TRIALS {
        return Err(BinomialError::InvalidArgument(format!(
            "n must not exceed {MAX_TRIALS}, got {n}"
        )));
    }
    Ok(n)
}

/// Checks a caller-supplied success probability.
///
/// # Errors
/// [`BinomialError::InvalidArgument`] if `pi` is not finite or lies outside `[0, 1]`.
pub fn validate_probability(pi: f64) -> Result<f64> {
    if !pi.is_finite() || !(0.0..=1.0).contains(&pi) {
        return Err(BinomialError::InvalidArgument(format!(
            "pi must be between 0 and 1, got {pi}"
        )));
    }
    Ok(pi)
}

/// Computes `[Pr(X = 0), ..., Pr(X = n)]` for `Binomial(n, pi)`.
///
/// # Mathematical Definition
/// ```text
/// Pr(X = x) = C(n, x) · pi^x · (1 − pi)^(n − x)
/// ```
/// evaluated in log space as
/// `ln n! − ln x! − ln (n−x)! + x·ln pi + (n−x)·ln(1 − pi)`,
/// so nothing overflows for large `n`. `pi = 0` and `pi = 1` put all mass
/// on `x = 0` and `x = n` respectively.
///
/// # Accuracy
/// Each entry carries a relative error of roughly `ulp(ln n!)` from the
/// final `exp`, so the table's sum misses one by something on the order
/// of `1e-12` at `n = 1000` and `1e-9` at `n = MAX_TRIALS`. Compensated summation in
/// the queries does not remove this error.
///
/// # Complexity
/// Time: O(n), Space: O(n)
///
/// # Errors
/// Same as [`validate_trials`] and [`validate_probability`].
///
/// # Examples
/// ```
/// use u_binomial::binomial::generate_table;
/// let t = generate_table(4, 0.5).unwrap();
/// assert_eq!(t.len(), 5);
/// assert!((t[2] - 0.375).abs() < 1e-15);
/// ```
pub fn generate_table(n: i64, pi: f64) -> Result<Vec<f64>> {
    let n = validate_trials(n)?;
    let pi = validate_probability(pi)?;
    Ok(compute_table(n, pi))
}

fn compute_table(n: u64, pi: f64) -> Vec<f64> {
    let started = Instant::now();
    let len = n as usize + 1;

    let table = if pi == 0.0 {
        let mut t = vec![0.0; len];
        t[0] = 1.0;
        t
    } else if pi == 1.0 {
        let mut t = vec![0.0; len];
        t[len - 1] = 1.0;
        t
    } else {
        let ln_fact = ln_factorials(n);
        let ln_p = pi.ln();
        let ln_q = (-pi).ln_1p();
        (0..=n)
            .map(|x| {
                let ln_pmf = ln_choose(&ln_fact, n, x) + x as f64 * ln_p + (n - x) as f64 * ln_q;
                ln_pmf.exp()
            })
            .collect()
    };

    debug!(
        n,
        pi,
        elapsed_us = started.elapsed().as_micros() as u64,
        "generated probability table"
    );
    table
}

/// One row of the probability table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outcome {
    pub x: u64,
    pub probability: f64,
}

/// Binomial distribution with `n` trials and success probability `pi`.
///
/// # Mathematical Definition
/// - PMF: C(n, x) · pi^x · (1 − pi)^(n − x), x ∈ {0, ..., n}
/// - Mean: n·pi
/// - Variance: n·pi·(1 − pi)
///
/// # Examples
/// ```
/// use u_binomial::Binomial;
/// let b = Binomial::new(10, 0.5).unwrap();
/// assert!((b.point_probability(5).unwrap() - 0.24609375).abs() < 1e-12);
/// assert_eq!(b.mean(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Binomial {
    n: u64,
    pi: f64,
    table: Vec<f64>,
}

impl Binomial {
    /// Creates the distribution and computes its table.
    ///
    /// # Errors
    /// [`BinomialError::InvalidArgument`] for negative or oversized `n`, or
    /// `pi` outside `[0, 1]`.
    pub fn new(n: i64, pi: f64) -> Result<Self> {
        let n = validate_trials(n)?;
        let pi = validate_probability(pi)?;
        Ok(Self {
            n,
            pi,
            table: compute_table(n, pi),
        })
    }

    /// Number of trials.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Success probability.
    pub fn pi(&self) -> f64 {
        self.pi
    }

    /// Replaces `n` and regenerates the whole table.
    ///
    /// On error nothing changes: the previous `n` and table stay in place.
    pub fn set_n(&mut self, n: i64) -> Result<()> {
        let n = validate_trials(n)?;
        self.table = compute_table(n, self.pi);
        self.n = n;
        Ok(())
    }

    /// Replaces `pi` and regenerates the whole table.
    ///
    /// On error nothing changes.
    pub fn set_pi(&mut self, pi: f64) -> Result<()> {
        let pi = validate_probability(pi)?;
        self.table = compute_table(self.n, pi);
        self.pi = pi;
        Ok(())
    }

    /// Probabilities indexed by `x`, length `n + 1`.
    pub fn probabilities(&self) -> &[f64] {
        &self.table
    }

    /// The table as `(x, probability)` rows in ascending `x`.
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.table
            .iter()
            .enumerate()
            .map(|(x, &probability)| Outcome {
                x: x as u64,
                probability,
            })
            .collect()
    }

    /// Pr(X = x).
    ///
    /// # Errors
    /// [`BinomialError::OutOfRange`] if `x < 0` or `x > n`.
    pub fn point_probability(&self, x: i64) -> Result<f64> {
        usize::try_from(x)
            .ok()
            .and_then(|i| self.table.get(i))
            .copied()
            .ok_or(BinomialError::OutOfRange { x, n: self.n })
    }

    /// Pr(X ≤ x): compensated sum of `table[0..=x]`.
    pub fn less_or_equal(&self, x: i64) -> f64 {
        if x < 0 {
            return 0.0;
        }
        let hi = (x as u64).min(self.n) as usize;
        kahan_sum(&self.table[..=hi]).min(1.0)
    }

    /// Pr(X < x) = Pr(X ≤ x − 1).
    pub fn less_than(&self, x: i64) -> f64 {
        self.less_or_equal(x.saturating_sub(1))
    }

    /// Pr(X ≥ x) = 1 − Pr(X < x).
    pub fn greater_or_equal(&self, x: i64) -> f64 {
        1.0 - self.less_than(x)
    }

    /// Pr(X > x) = 1 − Pr(X ≤ x).
    pub fn greater_than(&self, x: i64) -> f64 {
        1.0 - self.less_or_equal(x)
    }

    /// Dispatches a [`Query`] against this distribution.
    pub fn evaluate(&self, query: Query, x: i64) -> Result<f64> {
        match query {
            Query::LessOrEqual => Ok(self.less_or_equal(x)),
            Query::GreaterOrEqual => Ok(self.greater_or_equal(x)),
            Query::LessThan => Ok(self.less_than(x)),
            Query::GreaterThan => Ok(self.greater_than(x)),
            Query::Equal => self.point_probability(x),
        }
    }

    /// Mean = n·pi.
    pub fn mean(&self) -> f64 {
        self.n as f64 * self.pi
    }

    /// Variance = n·pi·(1 − pi).
    pub fn variance(&self) -> f64 {
        self.mean() * (1.0 - self.pi)
    }

    /// Standard deviation, `sqrt(variance)`.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Parameters and moments bundled for display.
    pub fn describe(&self) -> Summary {
        Summary {
            n: self.n,
            pi: self.pi,
            mean: self.mean(),
            variance: self.variance(),
            std_dev: self.std_dev(),
        }
    }
}

/// The five probability questions the calculator answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    LessOrEqual,
    GreaterOrEqual,
    LessThan,
    GreaterThan,
    Equal,
}

impl Query {
    /// Menu order.
    pub const ALL: [Query; 5] = [
        Query::LessOrEqual,
        Query::GreaterOrEqual,
        Query::LessThan,
        Query::GreaterThan,
        Query::Equal,
    ];

    /// Comparison operator as printed in `Pr(X <op> x)`.
    pub fn symbol(self) -> &'static str {
        match self {
            Query::LessOrEqual => "<=",
            Query::GreaterOrEqual => ">=",
            Query::LessThan => "<",
            Query::GreaterThan => ">",
            Query::Equal => "=",
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pr(X {} x)", self.symbol())
    }
}

/// Parameters and theoretical moments of a [`Binomial`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub n: u64,
    pub pi: f64,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "n\t\t{}", self.n)?;
        writeln!(f, "pi\t\t{}", self.pi)?;
        writeln!(f, "Mean\t\t{}", self.mean)?;
        writeln!(f, "Variance\t{}", self.variance)?;
        write!(f, "Std. dev.\t{}", self.std_dev)
    }
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn table_sums_to_one(n in 0_i64..500, pi in 0.0_f64..=1.0) {
            let b = Binomial::new(n, pi).unwrap();
            let total = kahan_sum(b.probabilities());
            prop_assert!((total - 1.0).abs() < 1e-9, "n={n} pi={pi} total={total}");
        }

        #[test]
        fn probabilities_in_unit_interval(n in 0_i64..300, pi in 0.0_f64..=1.0) {
            let b = Binomial::new(n, pi).unwrap();
            for x in 0..=n {
                let p = b.point_probability(x).unwrap();
                prop_assert!((0.0..=1.0).contains(&p), "Pr(X={x})={p}");
            }
        }

        #[test]
        fn complementary_tails(n in 0_i64..120, pi in 0.0_f64..=1.0) {
            let b = Binomial::new(n, pi).unwrap();
            for x in -2..=n + 2 {
                let a = b.less_or_equal(x) + b.greater_than(x);
                let c = b.less_than(x) + b.greater_or_equal(x);
                prop_assert!((a - 1.0).abs() < 1e-12, "x={x}: {a}");
                prop_assert!((c - 1.0).abs() < 1e-12, "x={x}: {c}");
            }
        }

        #[test]
        fn cumulative_is_monotonic(n in 1_i64..120, pi in 0.0_f64..=1.0) {
            let b = Binomial::new(n, pi).unwrap();
            let mut prev = 0.0;
            for x in 0..=n {
                let c = b.less_or_equal(x);
                prop_assert!(c >= prev - 1e-15);
                prev = c;
            }
        }

        #[test]
        fn moments_match_closed_form(n in 0_i64..10_000, pi in 0.0_f64..=1.0) {
            let b = Binomial::new(n, pi).unwrap();
            let nf = n as f64;
            prop_assert_eq!(b.mean(), nf * pi);
            prop_assert!((b.variance() - nf * pi * (1.0 - pi)).abs() <= 1e-9 * nf.max(1.0));
            prop_assert_eq!(b.std_dev(), b.variance().sqrt());
        }

        #[test]
        fn mutation_matches_fresh_construction(
            n0 in 0_i64..100,
            n1 in 0_i64..100,
            pi0 in 0.0_f64..=1.0,
            pi1 in 0.0_f64..=1.0,
        ) {
            let mut b = Binomial::new(n0, pi0).unwrap();
            b.set_n(n1).unwrap();
            b.set_pi(pi1).unwrap();
            prop_assert_eq!(b, Binomial::new(n1, pi1).unwrap());
        }
    }
}
