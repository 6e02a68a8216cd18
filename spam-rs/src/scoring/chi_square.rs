//! Chi-square upper tail probability

use super::gamma::gamma_q;

/// Probability that a chi-square variable with `degrees_of_freedom` exceeds `x`.
///
/// Evaluated as `Q(df / 2, x / 2)`. `x <= 0` gives 1.0 and `x == +inf`
/// gives 0.0, so infinite log sums coming out of the Fisher combiner
/// terminate cleanly instead of producing NaN.
pub fn chi_square_survival(x: f64, degrees_of_freedom: u32) -> f64 {
    if x.is_nan() || degrees_of_freedom == 0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 1.0;
    }
    if x.is_infinite() {
        return 0.0;
    }

    gamma_q(f64::from(degrees_of_freedom) / 2.0, x / 2.0)
}
