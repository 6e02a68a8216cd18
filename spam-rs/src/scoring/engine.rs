//! Scoring engine
//!
//! Resolves each token through a caller-supplied lookup, derives corpus totals
//! from the retained tokens only, and combines the corrected probabilities.
//! The engine holds no state; every call is independent.

use std::cmp::Ordering;

use tracing::debug;

use super::fisher::{fisher_statistics, FisherStatistics};
use super::probability::{robinson_correction, word_probability};
use super::types::*;

/// Stateless spamicity calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Spamicity of a token set.
    ///
    /// Tokens for which `lookup` returns `None` contribute nothing. When no
    /// token is retained the result is [`NEUTRAL_SCORE`].
    pub fn score<I, S, F>(&self, tokens: I, lookup: F) -> f64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> Option<TokenStatistics>,
    {
        let (retained, _) = Self::resolve(tokens, lookup);
        let totals = CorpusTotals::from_statistics(retained.iter().map(|(_, stats)| stats));

        let corrected: Vec<f64> = retained
            .iter()
            .map(|(_, stats)| Self::corrected(stats, &totals))
            .collect();

        Self::combine(&corrected).map_or(NEUTRAL_SCORE, |fisher| fisher.spamicity)
    }

    /// Same computation as [`score`](Self::score), keeping every intermediate.
    pub fn explain<I, S, F>(&self, tokens: I, lookup: F) -> ScoreReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> Option<TokenStatistics>,
    {
        let (retained, dropped) = Self::resolve(tokens, lookup);
        let totals = CorpusTotals::from_statistics(retained.iter().map(|(_, stats)| stats));

        let mut scores: Vec<TokenScore> = retained
            .into_iter()
            .map(|(token, stats)| TokenScore {
                probability: word_probability(stats.bad, stats.good, totals.total_bad, totals.total_good),
                corrected: Self::corrected(&stats, &totals),
                token,
                stats,
            })
            .collect();

        let corrected: Vec<f64> = scores.iter().map(|s| s.corrected).collect();
        let fisher = Self::combine(&corrected);

        scores.sort_by(|a, b| {
            let da = (a.corrected - 0.5).abs();
            let db = (b.corrected - 0.5).abs();
            db.partial_cmp(&da)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.token.cmp(&b.token))
        });

        ScoreReport {
            score: fisher.map_or(NEUTRAL_SCORE, |f| f.spamicity),
            totals,
            dropped,
            fisher,
            tokens: scores,
        }
    }

    /// Split tokens into (retained with stats, number dropped)
    fn resolve<I, S, F>(tokens: I, mut lookup: F) -> (Vec<(String, TokenStatistics)>, usize)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> Option<TokenStatistics>,
    {
        let mut retained = Vec::new();
        let mut dropped = 0;

        for token in tokens {
            let token = token.as_ref();
            match lookup(token) {
                Some(stats) => retained.push((token.to_string(), stats)),
                None => dropped += 1,
            }
        }

        (retained, dropped)
    }

    fn corrected(stats: &TokenStatistics, totals: &CorpusTotals) -> f64 {
        robinson_correction(stats.bad, stats.good, totals.total_bad, totals.total_good)
    }

    fn combine(corrected: &[f64]) -> Option<FisherStatistics> {
        let fisher = fisher_statistics(corrected);
        if fisher.is_none() {
            debug!("No known tokens, falling back to neutral score {}", NEUTRAL_SCORE);
        }
        fisher
    }
}
