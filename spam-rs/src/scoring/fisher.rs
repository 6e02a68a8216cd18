//! Fisher's method for combining per-token probabilities
//!
//! Two one-sided tests are run over the same probabilities: one against the
//! "message is ham" hypothesis (`Σ ln f`) and one against the "message is
//! spam" hypothesis (`Σ ln(1 - f)`). The final spamicity is
//! `(1 + Q - P) / 2`.

use serde::{Deserialize, Serialize};

use super::chi_square::chi_square_survival;
use super::types::NEUTRAL_SCORE;

/// Intermediate values of a Fisher combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FisherStatistics {
    /// Number of combined probabilities
    pub count: usize,
    /// Chi-square tail of `-2 Σ ln f`; small when the tokens look spammy
    pub ham_significance: f64,
    /// Chi-square tail of `-2 Σ ln(1 - f)`; small when the tokens look hammy
    pub spam_significance: f64,
    /// `(1 + Q - P) / 2`
    pub spamicity: f64,
}

/// Combine corrected probabilities into the Fisher statistics.
///
/// Returns `None` for an empty slice. Probabilities of exactly 0.0 or 1.0
/// are accepted: their infinite log terms drive the corresponding tail to 0.0.
pub fn fisher_statistics(probabilities: &[f64]) -> Option<FisherStatistics> {
    if probabilities.is_empty() {
        return None;
    }

    let (sum_ln_f, sum_ln_not_f) = probabilities
        .iter()
        .fold((0.0f64, 0.0f64), |(q, p), &f| (q + f.ln(), p + (1.0 - f).ln()));

    let degrees_of_freedom = u32::try_from(probabilities.len())
        .unwrap_or(u32::MAX / 2)
        .saturating_mul(2);

    let ham_significance = chi_square_survival(-2.0 * sum_ln_f, degrees_of_freedom);
    let spam_significance = chi_square_survival(-2.0 * sum_ln_not_f, degrees_of_freedom);

    Some(FisherStatistics {
        count: probabilities.len(),
        ham_significance,
        spam_significance,
        spamicity: (1.0 + ham_significance - spam_significance) / 2.0,
    })
}

/// Combined spamicity, or [`NEUTRAL_SCORE`] for an empty slice.
pub fn fisher_combine(probabilities: &[f64]) -> f64 {
    fisher_statistics(probabilities)
        .map(|stats| stats.spamicity)
        .unwrap_or(NEUTRAL_SCORE)
}
