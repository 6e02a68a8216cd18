//! Classifier service
//!
//! Decodes raw messages, tokenizes them, resolves token statistics from a
//! [`WordStatsStore`] and hands the snapshot to the [`ScoringEngine`]. Also
//! implements feeding and unfeeding labeled messages.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::mime::{DecodedMessage, MessageDecoder};
use crate::scoring::{Label, ScoreReport, ScoringEngine, TokenStatistics, Verdict};
use crate::store::{TokenChange, WordStatsStore};
use crate::tokenizer::{strip_html, Tokenizer};

/// Outcome of classifying one message
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub score: f64,
    pub verdict: Verdict,
    pub report: ScoreReport,
}

/// What a feed or unfeed changed in the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    /// Distinct tokens in the message
    pub tokens: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Unfeed only: tokens unknown to the store
    pub skipped: usize,
}

impl FeedSummary {
    fn from_changes(changes: &[TokenChange]) -> Self {
        let mut summary = Self {
            tokens: changes.len(),
            ..Self::default()
        };
        for change in changes {
            match (change.before, change.after) {
                (None, Some(_)) => summary.created += 1,
                (Some(_), Some(_)) => summary.updated += 1,
                (Some(_), None) => summary.deleted += 1,
                (None, None) => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Spam classifier bound to a statistics store
pub struct Classifier<S: WordStatsStore> {
    store: Arc<S>,
    tokenizer: Tokenizer,
    engine: ScoringEngine,
    cutoff: f64,
}

impl<S: WordStatsStore> Classifier<S> {
    /// Create a classifier over `store`
    pub fn new(store: Arc<S>, config: &ClassifierConfig) -> Self {
        Self {
            store,
            tokenizer: Tokenizer::new(config),
            engine: ScoringEngine::new(),
            cutoff: config.cutoff,
        }
    }

    /// Get the statistics store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Token set of a decoded message: subject, plain body and visible HTML text
    pub fn tokens(&self, message: &DecodedMessage) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();

        if let Some(subject) = &message.subject {
            self.tokenizer.extend(&mut tokens, subject);
        }
        if let Some(plain) = &message.plain_body {
            self.tokenizer.extend(&mut tokens, plain);
        }
        if let Some(html) = &message.html_body {
            self.tokenizer.extend(&mut tokens, &strip_html(html));
        }

        tokens
    }

    /// Decode and tokenize a raw message
    pub fn message_tokens(&self, raw: &[u8]) -> Result<BTreeSet<String>> {
        let message = MessageDecoder::decode(raw)?;
        debug!("Decoded message (charset {})", message.charset);
        Ok(self.tokens(&message))
    }

    /// Classify a raw message
    pub async fn classify(&self, raw: &[u8]) -> Result<Classification> {
        let tokens = self.message_tokens(raw)?;
        self.classify_tokens(&tokens).await
    }

    /// Classify an already tokenized message.
    ///
    /// Statistics are fully resolved before scoring starts; a store failure
    /// aborts classification instead of scoring a partial snapshot.
    pub async fn classify_tokens(&self, tokens: &BTreeSet<String>) -> Result<Classification> {
        let token_list: Vec<String> = tokens.iter().cloned().collect();
        let snapshot = self.store.get_many(&token_list).await?;

        let report = self
            .engine
            .explain(tokens.iter(), |token| snapshot.get(token).copied());
        let verdict = Verdict::from_score(report.score, self.cutoff);

        info!(
            "Classified message as {} ({:.4}, {} known / {} unknown tokens)",
            verdict,
            report.score,
            report.tokens.len(),
            report.dropped
        );

        Ok(Classification {
            score: report.score,
            verdict,
            report,
        })
    }

    /// Record a raw message as spam or ham
    pub async fn feed(&self, raw: &[u8], label: Label) -> Result<FeedSummary> {
        let tokens = self.message_tokens(raw)?;
        self.feed_tokens(&tokens, label).await
    }

    /// Add one observation on the `label` side for every token.
    ///
    /// The whole token set is applied in one store update, so concurrent
    /// feeds never lose counts and a failed feed changes nothing.
    pub async fn feed_tokens(&self, tokens: &BTreeSet<String>, label: Label) -> Result<FeedSummary> {
        let token_list: Vec<String> = tokens.iter().cloned().collect();
        let increment = move |stats: Option<TokenStatistics>| {
            Some(match stats {
                Some(stats) => stats.increment(label),
                None => TokenStatistics::first_sighting(label),
            })
        };
        let changes = self.store.update_many(&token_list, &increment).await?;
        let summary = FeedSummary::from_changes(&changes);

        info!(
            "Fed {} tokens as {} ({} new, {} updated)",
            summary.tokens, label, summary.created, summary.updated
        );
        Ok(summary)
    }

    /// Undo a previous [`feed`](Self::feed) of a raw message
    pub async fn unfeed(&self, raw: &[u8], label: Label) -> Result<FeedSummary> {
        let tokens = self.message_tokens(raw)?;
        self.unfeed_tokens(&tokens, label).await
    }

    /// Remove one observation on the `label` side, clamped at zero.
    ///
    /// Tokens left with no observation at all are deleted, so every stored
    /// token carries evidence. Unknown tokens are skipped.
    pub async fn unfeed_tokens(&self, tokens: &BTreeSet<String>, label: Label) -> Result<FeedSummary> {
        let token_list: Vec<String> = tokens.iter().cloned().collect();
        let decrement = move |stats: Option<TokenStatistics>| {
            stats.map(|stats| stats.decrement(label)).filter(|stats| !stats.is_empty())
        };
        let changes = self.store.update_many(&token_list, &decrement).await?;
        let summary = FeedSummary::from_changes(&changes);

        info!(
            "Unfed {} tokens as {} ({} updated, {} deleted, {} unknown)",
            summary.tokens, label, summary.updated, summary.deleted, summary.skipped
        );
        Ok(summary)
    }

    /// Statistics of a single token
    pub async fn query(&self, token: &str) -> Result<Option<TokenStatistics>> {
        self.store.get(token).await
    }

    /// Drop a token from the store
    pub async fn forget(&self, token: &str) -> Result<()> {
        self.store.delete(token).await
    }
}
