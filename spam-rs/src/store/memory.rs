use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{TokenChange, UpdateFn, WordStatsStore};
use crate::error::Result;
use crate::scoring::TokenStatistics;

/// Non-persistent store kept in a map
#[derive(Default)]
pub struct MemoryWordStore {
    words: RwLock<HashMap<String, TokenStatistics>>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens
    pub async fn len(&self) -> usize {
        self.words.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.words.read().await.is_empty()
    }
}

impl FromIterator<(String, TokenStatistics)> for MemoryWordStore {
    fn from_iter<I: IntoIterator<Item = (String, TokenStatistics)>>(iter: I) -> Self {
        Self {
            words: RwLock::new(iter.into_iter().collect()),
        }
    }
}

#[async_trait]
impl WordStatsStore for MemoryWordStore {
    async fn get(&self, token: &str) -> Result<Option<TokenStatistics>> {
        Ok(self.words.read().await.get(token).copied())
    }

    async fn set(&self, token: &str, stats: TokenStatistics) -> Result<()> {
        self.words.write().await.insert(token.to_string(), stats);
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<()> {
        self.words.write().await.remove(token);
        Ok(())
    }

    async fn update_many(&self, tokens: &[String], update: &UpdateFn) -> Result<Vec<TokenChange>> {
        let mut words = self.words.write().await;

        let changes = tokens
            .iter()
            .map(|token| {
                let before = words.get(token).copied();
                let after = update(before);
                match after {
                    Some(stats) => words.insert(token.clone(), stats),
                    None => words.remove(token),
                };
                TokenChange {
                    token: token.clone(),
                    before,
                    after,
                }
            })
            .collect();

        Ok(changes)
    }
}
