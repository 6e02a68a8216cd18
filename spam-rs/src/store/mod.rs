//! Token statistics storage
//!
//! Provides word statistics backends:
//! - [`sqlite`]: persistent SQLite storage
//! - [`memory`]: in-process map, for tests and dry runs

pub mod memory;
pub mod sqlite;

pub use memory::MemoryWordStore;
pub use sqlite::SqliteWordStore;

use std::collections::HashMap;

use crate::error::Result;
use crate::scoring::TokenStatistics;

/// Read-modify-write step applied to one token. It receives the current
/// statistics and returns the new ones; `None` removes the token.
pub type UpdateFn = dyn Fn(Option<TokenStatistics>) -> Option<TokenStatistics> + Send + Sync;

/// Statistics of a token before and after an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenChange {
    pub token: String,
    pub before: Option<TokenStatistics>,
    pub after: Option<TokenStatistics>,
}

/// Key-value store of per-token spam/ham counts
#[async_trait::async_trait]
pub trait WordStatsStore: Send + Sync {
    /// Statistics of a token, `None` when the token was never fed
    async fn get(&self, token: &str) -> Result<Option<TokenStatistics>>;

    /// Insert or replace the statistics of a token
    async fn set(&self, token: &str, stats: TokenStatistics) -> Result<()>;

    /// Remove a token; removing an unknown token is not an error
    async fn delete(&self, token: &str) -> Result<()>;

    /// Apply `update` to every token as one atomic step: concurrent updates
    /// never interleave, and a failure leaves no token changed.
    async fn update_many(&self, tokens: &[String], update: &UpdateFn) -> Result<Vec<TokenChange>>;

    /// Resolve many tokens at once. Unknown tokens are absent from the map.
    async fn get_many(&self, tokens: &[String]) -> Result<HashMap<String, TokenStatistics>> {
        let mut found = HashMap::with_capacity(tokens.len());
        for token in tokens {
            if let Some(stats) = self.get(token).await? {
                found.insert(token.clone(), stats);
            }
        }
        Ok(found)
    }
}
