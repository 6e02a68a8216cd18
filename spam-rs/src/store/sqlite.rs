//! SQLite word statistics store
//!
//! Counts are kept in their textual `"<bad> <good>"` form, one row per token.
//!
//! # Usage
//! ```no_run
//! use spam_rs::scoring::TokenStatistics;
//! use spam_rs::store::{SqliteWordStore, WordStatsStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteWordStore::new("sqlite://spam.db").await?;
//! store.set("free", TokenStatistics::new(12, 1)).await?;
//! assert_eq!(store.get("free").await?, Some(TokenStatistics::new(12, 1)));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{TokenChange, UpdateFn, WordStatsStore};
use crate::error::Result;
use crate::scoring::TokenStatistics;

const UPSERT: &str = r#"
    INSERT INTO word_stats (token, counts, updated_at)
    VALUES (?, ?, ?)
    ON CONFLICT(token) DO UPDATE SET counts = excluded.counts, updated_at = excluded.updated_at
"#;

/// Persistent store backed by a SQLite database
#[derive(Clone)]
pub struct SqliteWordStore {
    pub db: Arc<SqlitePool>,
    /// Serializes read-modify-write transactions of this process
    write_lock: Arc<Mutex<()>>,
}

impl SqliteWordStore {
    /// Open (or create) the database and its table
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let db = SqlitePool::connect_with(options).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS word_stats (
                token TEXT PRIMARY KEY,
                counts TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&db)
        .await?;

        info!("Opened word statistics store at {}", database_url);

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Number of stored tokens
    pub async fn token_count(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM word_stats")
            .fetch_one(self.db.as_ref())
            .await?;
        Ok(count.max(0) as u64)
    }

    /// Close the underlying connection pool
    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[async_trait]
impl WordStatsStore for SqliteWordStore {
    async fn get(&self, token: &str) -> Result<Option<TokenStatistics>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT counts FROM word_stats WHERE token = ?")
            .bind(token)
            .fetch_optional(self.db.as_ref())
            .await?;

        row.map(|(counts,)| counts.parse()).transpose()
    }

    async fn set(&self, token: &str, stats: TokenStatistics) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        sqlx::query(UPSERT)
            .bind(token)
            .bind(stats.to_string())
            .bind(Utc::now().to_rfc3339())
            .execute(self.db.as_ref())
            .await?;

        debug!("Set {} = {}", token, stats);
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        sqlx::query("DELETE FROM word_stats WHERE token = ?")
            .bind(token)
            .execute(self.db.as_ref())
            .await?;

        debug!("Deleted {}", token);
        Ok(())
    }

    async fn update_many(&self, tokens: &[String], update: &UpdateFn) -> Result<Vec<TokenChange>> {
        let _guard = self.write_lock.lock().await;
        let now = Utc::now().to_rfc3339();
        let mut changes = Vec::with_capacity(tokens.len());

        // Dropping the transaction on an early return rolls it back
        let mut tx = self.db.begin().await?;

        for token in tokens {
            let row: Option<(String,)> = sqlx::query_as("SELECT counts FROM word_stats WHERE token = ?")
                .bind(token.as_str())
                .fetch_optional(&mut *tx)
                .await?;
            let before: Option<TokenStatistics> = row.map(|(counts,)| counts.parse()).transpose()?;
            let after = update(before);

            match after {
                Some(stats) if after != before => {
                    sqlx::query(UPSERT)
                        .bind(token.as_str())
                        .bind(stats.to_string())
                        .bind(now.as_str())
                        .execute(&mut *tx)
                        .await?;
                }
                None if before.is_some() => {
                    sqlx::query("DELETE FROM word_stats WHERE token = ?")
                        .bind(token.as_str())
                        .execute(&mut *tx)
                        .await?;
                }
                _ => {}
            }

            changes.push(TokenChange {
                token: token.clone(),
                before,
                after,
            });
        }

        tx.commit().await?;
        debug!("Updated {} tokens", changes.len());
        Ok(changes)
    }
}
