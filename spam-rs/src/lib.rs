//! spam-rs: Bayesian spam classifier
//!
//! Scores email messages with Robinson-corrected per-token probabilities
//! combined through Fisher's method.
//!
//! # Features
//!
//! - **Scoring core**: pure, reentrant spamicity computation with its own
//!   chi-square tail (regularized incomplete gamma) implementation
//! - **Decoding**: MIME parsing and charset normalization to UTF-8
//! - **Tokenizing**: deduplicated, lowercased and optionally stemmed tokens
//! - **Storage**: per-token spam/ham counts in SQLite
//!
//! # Example
//!
//! ```no_run
//! use spam_rs::classifier::Classifier;
//! use spam_rs::config::Config;
//! use spam_rs::scoring::Label;
//! use spam_rs::store::SqliteWordStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let store = Arc::new(SqliteWordStore::new(&config.store.database_url).await?);
//!     let classifier = Classifier::new(store, &config.classifier);
//!
//!     classifier.feed(b"Subject: cheap pills\r\n\r\nbuy now", Label::Spam).await?;
//!     let result = classifier.classify(b"Subject: pills\r\n\r\ncheap").await?;
//!     println!("{} {:.4}", result.verdict, result.score);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`scoring`]: probability estimation and Fisher combination
//! - [`classifier`]: decode, tokenize, resolve and score messages; feed/unfeed
//! - [`mime`]: raw message decoding
//! - [`tokenizer`]: text to token set
//! - [`store`]: token statistics backends
//! - [`config`]: configuration management
//! - [`error`]: error types and handling

pub mod classifier;
pub mod config;
pub mod error;
pub mod mime;
pub mod scoring;
pub mod store;
pub mod tokenizer;

// Re-export commonly used types
pub use classifier::{Classification, Classifier};
pub use config::Config;
pub use error::{Result, SpamError};
pub use scoring::ScoringEngine;
