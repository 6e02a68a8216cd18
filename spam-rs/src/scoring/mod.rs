//! Statistical scoring core
//!
//! Robinson-corrected word probabilities combined with Fisher's method. The
//! chi-square tail is computed from a self-contained regularized incomplete
//! gamma implementation.
//!
//! Nothing in this module performs I/O or keeps state between calls.

pub mod chi_square;
pub mod engine;
pub mod fisher;
pub mod gamma;
pub mod probability;
pub mod types;

pub use chi_square::chi_square_survival;
pub use engine::ScoringEngine;
pub use fisher::{fisher_combine, fisher_statistics, FisherStatistics};
pub use gamma::{gamma_p, gamma_q, log_gamma};
pub use probability::{robinson_correction, word_probability, PRIOR_PROBABILITY, PRIOR_STRENGTH};
pub use types::*;
