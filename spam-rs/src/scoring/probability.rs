//! Per-token spam probabilities
//!
//! Raw maximum-likelihood estimate plus Robinson's shrinkage toward a prior.

/// Strength of the prior, in units of observations.
pub const PRIOR_STRENGTH: f64 = 0.0178;

/// Probability assigned to a token with no evidence.
pub const PRIOR_PROBABILITY: f64 = 0.52;

/// Raw probability that a message containing this token is spam.
///
/// A token never seen in spam scores 0.0 and a token never seen in ham
/// scores 1.0. The spam check wins when both sides are empty.
pub fn word_probability(bad: u64, good: u64, bad_total: u64, good_total: u64) -> f64 {
    if bad == 0 || bad_total == 0 {
        return 0.0;
    }
    if good == 0 || good_total == 0 {
        return 1.0;
    }

    let bad_ratio = bad as f64 / bad_total as f64;
    let good_ratio = good as f64 / good_total as f64;
    bad_ratio / (bad_ratio + good_ratio)
}

/// Robinson's corrected probability `(s·x + n·p) / (s + n)`.
///
/// `n` is the number of observations of the token. With `n == 0` the result
/// is exactly [`PRIOR_PROBABILITY`].
pub fn robinson_correction(bad: u64, good: u64, bad_total: u64, good_total: u64) -> f64 {
    let n = bad.saturating_add(good) as f64;
    let p = word_probability(bad, good, bad_total, good_total);

    (PRIOR_STRENGTH * PRIOR_PROBABILITY + n * p) / (PRIOR_STRENGTH + n)
}
