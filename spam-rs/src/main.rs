//! Command line front end for the spam classifier
//!
//! # Usage
//!
//! ```bash
//! # Train on labeled messages
//! spam-rs feed --spam junk/*.eml
//! spam-rs feed --ham inbox/*.eml
//!
//! # Classify a message
//! spam-rs classify message.eml --cutoff 0.9
//!
//! # Inspect or drop a token
//! spam-rs query free money
//! spam-rs forget free
//! ```

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use spam_rs::classifier::Classifier;
use spam_rs::config::{Config, LoggingConfig};
use spam_rs::scoring::Label;
use spam_rs::store::SqliteWordStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "spam-rs")]
#[command(about = "Bayesian spam classifier", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database URL, overrides the configuration (e.g., sqlite://spam.db)
    #[arg(short, long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a message and print "SPAM <score>" or "HAM <score>"
    Classify {
        /// Raw message file
        file: PathBuf,
        /// Spamicity at or above which the message is spam
        #[arg(long)]
        cutoff: Option<f64>,
        /// Print the full scoring report as JSON
        #[arg(long)]
        explain: bool,
    },
    /// Record messages as spam or ham
    Feed(TrainArgs),
    /// Undo a previous feed
    Unfeed(TrainArgs),
    /// Print the statistics of tokens
    Query {
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    /// Remove tokens from the store
    Forget {
        #[arg(required = true)]
        tokens: Vec<String>,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// Messages are spam
    #[arg(long, conflicts_with = "ham", required_unless_present = "ham")]
    spam: bool,
    /// Messages are ham
    #[arg(long)]
    ham: bool,
    /// Raw message files
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl TrainArgs {
    fn label(&self) -> Label {
        if self.spam {
            Label::Spam
        } else {
            Label::Ham
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(db) = &cli.db {
        config.store.database_url = db.clone();
    }
    if let Commands::Classify { cutoff: Some(cutoff), .. } = &cli.command {
        config.classifier.cutoff = *cutoff;
    }
    config.validate()?;

    init_logging(&config.logging);

    let store = Arc::new(SqliteWordStore::new(&config.store.database_url).await?);
    let classifier = Classifier::new(Arc::clone(&store), &config.classifier);

    match cli.command {
        Commands::Classify { file, explain, .. } => {
            let raw = read_message(&file).await?;
            let result = classifier.classify(&raw).await?;

            println!("{} {:.6}", result.verdict, result.score);
            if explain {
                println!("{}", serde_json::to_string_pretty(&result.report)?);
            }
        }
        Commands::Feed(args) => {
            let label = args.label();
            for file in &args.files {
                let raw = read_message(file).await?;
                let summary = classifier.feed(&raw, label).await?;
                println!("{}: {} tokens fed as {}", file.display(), summary.tokens, label);
            }
        }
        Commands::Unfeed(args) => {
            let label = args.label();
            for file in &args.files {
                let raw = read_message(file).await?;
                let summary = classifier.unfeed(&raw, label).await?;
                println!("{}: {} tokens unfed as {}", file.display(), summary.tokens, label);
            }
        }
        Commands::Query { tokens } => {
            for token in &tokens {
                match classifier.query(token).await? {
                    Some(stats) => println!("{} {}", token, stats),
                    None => println!("{} -", token),
                }
            }
        }
        Commands::Forget { tokens } => {
            for token in &tokens {
                classifier.forget(token).await?;
                println!("{} forgotten", token);
            }
        }
    }

    store.close().await;
    info!("Done");
    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spam_rs={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

async fn read_message(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}
