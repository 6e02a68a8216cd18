//! Scoring types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpamError;

use super::fisher::FisherStatistics;

/// Score returned when no token of a message is known to the store.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Default cutoff at or above which a message is labeled spam.
pub const DEFAULT_CUTOFF: f64 = 0.90;

/// Per-token counts of labeled messages that contained the token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenStatistics {
    /// Spam messages containing the token
    pub bad: u64,
    /// Ham messages containing the token
    pub good: u64,
}

impl TokenStatistics {
    pub fn new(bad: u64, good: u64) -> Self {
        Self { bad, good }
    }

    /// Counts for a token seen for the first time in a message of `label`
    pub fn first_sighting(label: Label) -> Self {
        match label {
            Label::Spam => Self::new(1, 0),
            Label::Ham => Self::new(0, 1),
        }
    }

    /// Total observations of the token
    pub fn observations(&self) -> u64 {
        self.bad.saturating_add(self.good)
    }

    /// True when neither side has any count left
    pub fn is_empty(&self) -> bool {
        self.bad == 0 && self.good == 0
    }

    /// Add one observation on the `label` side
    pub fn increment(self, label: Label) -> Self {
        match label {
            Label::Spam => Self::new(self.bad.saturating_add(1), self.good),
            Label::Ham => Self::new(self.bad, self.good.saturating_add(1)),
        }
    }

    /// Remove one observation on the `label` side, clamped at zero
    pub fn decrement(self, label: Label) -> Self {
        match label {
            Label::Spam => Self::new(self.bad.saturating_sub(1), self.good),
            Label::Ham => Self::new(self.bad, self.good.saturating_sub(1)),
        }
    }
}

/// Store representation: `"<bad> <good>"`
impl fmt::Display for TokenStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.bad, self.good)
    }
}

impl FromStr for TokenStatistics {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(' ');
        let (Some(bad), Some(good), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(SpamError::InvalidStatistics(format!(
                "expected \"<bad> <good>\", got {:?}",
                s
            )));
        };

        let parse = |field: &str| {
            field.parse::<u64>().map_err(|e| {
                SpamError::InvalidStatistics(format!("bad count field {:?} in {:?}: {}", field, s, e))
            })
        };

        Ok(Self::new(parse(bad)?, parse(good)?))
    }
}

/// Which side of the corpus a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Spam,
    Ham,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Spam => write!(f, "spam"),
            Label::Ham => write!(f, "ham"),
        }
    }
}

/// Sums of bad/good counts over the tokens retained in one scoring call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusTotals {
    pub total_bad: u64,
    pub total_good: u64,
}

impl CorpusTotals {
    /// Sum over the given statistics
    pub fn from_statistics<'a, I>(stats: I) -> Self
    where
        I: IntoIterator<Item = &'a TokenStatistics>,
    {
        stats.into_iter().fold(Self::default(), |acc, s| Self {
            total_bad: acc.total_bad.saturating_add(s.bad),
            total_good: acc.total_good.saturating_add(s.good),
        })
    }
}

/// Binary outcome of comparing a spamicity against a cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Spam,
    Ham,
}

impl Verdict {
    /// `score >= cutoff` is spam
    pub fn from_score(score: f64, cutoff: f64) -> Self {
        if score >= cutoff {
            Verdict::Spam
        } else {
            Verdict::Ham
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Spam => write!(f, "SPAM"),
            Verdict::Ham => write!(f, "HAM"),
        }
    }
}

/// Contribution of a single retained token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenScore {
    pub token: String,
    pub stats: TokenStatistics,
    /// Raw word probability
    pub probability: f64,
    /// Robinson-corrected probability fed to the combiner
    pub corrected: f64,
}

/// Detailed outcome of a scoring call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Final spamicity in [0, 1]
    pub score: f64,
    pub totals: CorpusTotals,
    /// Tokens dropped because the store had no statistics for them
    pub dropped: usize,
    /// `None` when no token was retained
    pub fisher: Option<FisherStatistics>,
    /// Retained tokens, most decisive first
    pub tokens: Vec<TokenScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_display() {
        assert_eq!(TokenStatistics::new(3, 14).to_string(), "3 14");
        assert_eq!(TokenStatistics::default().to_string(), "0 0");
    }

    #[test]
    fn test_statistics_parse() {
        let stats: TokenStatistics = "12 7".parse().unwrap();
        assert_eq!(stats, TokenStatistics::new(12, 7));
    }

    #[test]
    fn test_statistics_parse_rejects_malformed() {
        for input in ["", "12", "12 7 1", "12  7", "-1 3", "a b", "1 2\n"] {
            assert!(
                input.parse::<TokenStatistics>().is_err(),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn test_first_sighting() {
        assert_eq!(TokenStatistics::first_sighting(Label::Spam).to_string(), "1 0");
        assert_eq!(TokenStatistics::first_sighting(Label::Ham).to_string(), "0 1");
    }

    #[test]
    fn test_decrement_clamps_at_zero() {
        let stats = TokenStatistics::new(0, 2).decrement(Label::Spam);
        assert_eq!(stats, TokenStatistics::new(0, 2));

        let stats = TokenStatistics::new(1, 1).decrement(Label::Ham).decrement(Label::Spam);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_totals_sum_exactly_the_given_set() {
        let stats = [TokenStatistics::new(1, 2), TokenStatistics::new(10, 0), TokenStatistics::new(0, 5)];
        let totals = CorpusTotals::from_statistics(&stats);
        assert_eq!(totals.total_bad, 11);
        assert_eq!(totals.total_good, 7);
    }

    #[test]
    fn test_verdict_cutoff_is_inclusive() {
        assert_eq!(Verdict::from_score(0.9, DEFAULT_CUTOFF), Verdict::Spam);
        assert_eq!(Verdict::from_score(0.8999, DEFAULT_CUTOFF), Verdict::Ham);
        assert_eq!(Verdict::Spam.to_string(), "SPAM");
    }
}
