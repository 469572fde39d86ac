//! Log-factorials and binomial coefficients.
//!
//! Factorials overflow `f64` at 171!, so the table generator never forms
//! them directly. It works with `ln k!` built as a compensated running sum
//! of `ln k`, and combines them as `ln C(n, x) = ln n! − ln x! − ln (n−x)!`.

use crate::stats::CompensatedSum;

/// Returns `[ln 0!, ln 1!, ..., ln n!]`.
///
/// Each entry is the compensated sum of `ln 1 + ln 2 + ... + ln k`, so
/// the absolute error stays near one ulp of `ln n!` even for large `n`.
///
/// # Complexity
/// Time: O(n), Space: O(n)
///
/// # Examples
/// ```
/// use u_binomial::special::ln_factorials;
/// let lf = ln_factorials(5);
/// assert_eq!(lf.len(), 6);
/// assert!((lf[5] - 120.0_f64.ln()).abs() < 1e-13);
/// ```
pub fn ln_factorials(n: u64) -> Vec<f64> {
    let mut table = Vec::with_capacity(n as usize + 1);
    let mut acc = CompensatedSum::new();
    table.push(0.0);
    for k in 1..=n {
        acc.add((k as f64).ln());
        table.push(acc.total());
    }
    table
}

/// `ln C(n, k)` from a table produced by [`ln_factorials`] of length ≥ n+1.
///
/// # Panics
/// Panics if `k > n` or the table is shorter than `n + 1`.
#[inline]
pub fn ln_choose(ln_fact: &[f64], n: u64, k: u64) -> f64 {
    let (n, k) = (n as usize, k as usize);
    ln_fact[n] - ln_fact[k] - ln_fact[n - k]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factorial(k: u64) -> f64 {
        (1..=k).map(|i| i as f64).product()
    }

    #[test]
    fn test_ln_factorials_small() {
        let lf = ln_factorials(20);
        assert_eq!(lf[0], 0.0);
        assert_eq!(lf[1], 0.0);
        for k in 2..=20 {
            let expected = factorial(k).ln();
            assert!(
                (lf[k as usize] - expected).abs() < 1e-12,
                "ln {k}! = {} expected {expected}",
                lf[k as usize]
            );
        }
    }

    #[test]
    fn test_ln_factorials_zero() {
        assert_eq!(ln_factorials(0), vec![0.0]);
    }

    #[test]
    fn test_ln_factorials_past_f64_overflow() {
        // 171! overflows f64; its log is fine. Stirling with two terms
        // is accurate to ~1e-8 at this size.
        let lf = ln_factorials(1000);
        let n = 1000.0_f64;
        let stirling = n * n.ln() - n + 0.5 * (2.0 * std::f64::consts::PI * n).ln() + 1.0 / (12.0 * n);
        assert!(lf[1000].is_finite());
        assert!((lf[1000] - stirling).abs() < 1e-8);
    }

    #[test]
    fn test_ln_choose_known_values() {
        let lf = ln_factorials(10);
        assert!((ln_choose(&lf, 10, 5) - 252.0_f64.ln()).abs() < 1e-13);
        assert!((ln_choose(&lf, 4, 2) - 6.0_f64.ln()).abs() < 1e-13);
        assert_eq!(ln_choose(&lf, 10, 0), 0.0);
        assert_eq!(ln_choose(&lf, 10, 10), 0.0);
    }

    #[test]
    fn test_ln_choose_symmetric() {
        let lf = ln_factorials(50);
        for k in 0..=50 {
            let diff = ln_choose(&lf, 50, k) - ln_choose(&lf, 50, 50 - k);
            assert!(diff.abs() < 1e-12, "k={k} diff={diff}");
        }
    }
}
