//! Integration tests for the classifier over a SQLite store

use spam_rs::classifier::Classifier;
use spam_rs::config::ClassifierConfig;
use spam_rs::scoring::{Label, TokenStatistics, Verdict, NEUTRAL_SCORE};
use spam_rs::store::{SqliteWordStore, WordStatsStore};
use spam_rs::SpamError;
use std::sync::Arc;

const SPAM_MESSAGES: &[&str] = &[
    "From: promo@deals.example\r\nSubject: WINNER! Claim your free prize\r\n\r\nClick here to claim your free prize now. Limited offer!\r\n",
    "From: pharmacy@cheap.example\r\nSubject: Cheap pills, free shipping\r\n\r\nBuy cheap pills online. Free shipping, no prescription.\r\n",
    "From: lottery@win.example\r\nSubject: You are a winner\r\nContent-Type: text/html; charset=utf-8\r\n\r\n<html><body><b>Claim</b> your <a href=\"http://x\">free prize</a> now!</body></html>\r\n",
];

const HAM_MESSAGES: &[&str] = &[
    "From: alice@corp.example\r\nSubject: Project meeting agenda\r\n\r\nHi team, the agenda for tomorrow's project meeting is attached.\r\n",
    "From: bob@corp.example\r\nSubject: Re: quarterly report\r\n\r\nThanks for the quarterly report, I added comments to the budget section.\r\n",
    "From: carol@corp.example\r\nSubject: Lunch tomorrow?\r\n\r\nAre you free for lunch tomorrow after the meeting?\r\n",
];

/// Helper to build a classifier over a fresh SQLite database
async fn setup() -> (Classifier<SqliteWordStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("spam.db").display());
    let store = Arc::new(SqliteWordStore::new(&url).await.unwrap());

    let config = ClassifierConfig {
        stemming: false,
        ..ClassifierConfig::default()
    };
    (Classifier::new(store, &config), dir)
}

async fn train(classifier: &Classifier<SqliteWordStore>) {
    for message in SPAM_MESSAGES {
        classifier.feed(message.as_bytes(), Label::Spam).await.unwrap();
    }
    for message in HAM_MESSAGES {
        classifier.feed(message.as_bytes(), Label::Ham).await.unwrap();
    }
}

#[tokio::test]
async fn test_feed_records_counts() {
    let (classifier, _dir) = setup().await;
    train(&classifier).await;

    // "prize" appears in two spam messages and no ham message
    assert_eq!(classifier.query("prize").await.unwrap(), Some(TokenStatistics::new(2, 0)));
    // "free" appears in every spam message and in one ham message
    assert_eq!(classifier.query("free").await.unwrap(), Some(TokenStatistics::new(3, 1)));
    assert_eq!(classifier.query("agenda").await.unwrap(), Some(TokenStatistics::new(0, 1)));
    assert_eq!(classifier.query("nonexistent").await.unwrap(), None);
}

#[tokio::test]
async fn test_html_markup_is_not_tokenized() {
    let (classifier, _dir) = setup().await;
    train(&classifier).await;

    assert_eq!(classifier.query("href").await.unwrap(), None);
    assert_eq!(classifier.query("html").await.unwrap(), None);
    assert_eq!(classifier.query("claim").await.unwrap(), Some(TokenStatistics::new(2, 0)));
}

#[tokio::test]
async fn test_classify_spam() {
    let (classifier, _dir) = setup().await;
    train(&classifier).await;

    let message = b"Subject: Claim your prize\r\n\r\nWinner! Click here for cheap pills and a free prize.\r\n";
    let result = classifier.classify(message).await.unwrap();

    assert_eq!(result.verdict, Verdict::Spam, "score = {}", result.score);
    assert!(result.score >= classifier.cutoff());
}

#[tokio::test]
async fn test_classify_ham() {
    let (classifier, _dir) = setup().await;
    train(&classifier).await;

    let message = b"Subject: agenda\r\n\r\nThe project agenda and the quarterly budget comments are attached.\r\n";
    let result = classifier.classify(message).await.unwrap();

    assert_eq!(result.verdict, Verdict::Ham);
    assert!(result.score < 0.1, "score = {}", result.score);
}

#[tokio::test]
async fn test_classify_unknown_vocabulary_is_neutral() {
    let (classifier, _dir) = setup().await;
    train(&classifier).await;

    let result = classifier.classify(b"Subject: zyx\r\n\r\nqwv plk\r\n").await.unwrap();
    assert_eq!(result.score, NEUTRAL_SCORE);
    assert!(result.report.fisher.is_none());
    assert_eq!(result.verdict, Verdict::Ham);
}

#[tokio::test]
async fn test_classify_does_not_modify_store() {
    let (classifier, _dir) = setup().await;
    train(&classifier).await;

    let before = classifier.store().token_count().await.unwrap();
    classifier.classify(b"Subject: brand new words\r\n\r\nnothing seen before\r\n").await.unwrap();
    assert_eq!(classifier.store().token_count().await.unwrap(), before);
}

#[tokio::test]
async fn test_unfeed_reverses_feed() {
    let (classifier, _dir) = setup().await;
    let message = SPAM_MESSAGES[1].as_bytes();

    classifier.feed(message, Label::Spam).await.unwrap();
    assert!(classifier.store().token_count().await.unwrap() > 0);

    let summary = classifier.unfeed(message, Label::Spam).await.unwrap();
    assert_eq!(summary.deleted, summary.tokens);
    assert_eq!(classifier.store().token_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_store_values_use_textual_counts() {
    let (classifier, _dir) = setup().await;
    train(&classifier).await;

    let (counts,): (String,) = sqlx::query_as("SELECT counts FROM word_stats WHERE token = 'free'")
        .fetch_one(classifier.store().db.as_ref())
        .await
        .unwrap();
    assert_eq!(counts, "3 1");
}

#[tokio::test]
async fn test_store_failure_surfaces_before_scoring() {
    let (classifier, _dir) = setup().await;
    classifier.store().set("broken", TokenStatistics::new(1, 0)).await.unwrap();
    sqlx::query("UPDATE word_stats SET counts = 'not numbers' WHERE token = 'broken'")
        .execute(classifier.store().db.as_ref())
        .await
        .unwrap();

    let result = classifier.classify(b"Subject: broken\r\n\r\nbroken\r\n").await;
    assert!(matches!(result, Err(SpamError::InvalidStatistics(_))));
}

#[tokio::test]
async fn test_concurrent_classification() {
    let (classifier, _dir) = setup().await;
    train(&classifier).await;
    let classifier = Arc::new(classifier);

    let mut handles = Vec::new();
    for i in 0..8 {
        let classifier = Arc::clone(&classifier);
        handles.push(tokio::spawn(async move {
            let message = if i % 2 == 0 { SPAM_MESSAGES[0] } else { HAM_MESSAGES[0] };
            classifier.classify(message.as_bytes()).await.unwrap().score
        }));
    }

    let mut scores = Vec::new();
    for handle in handles {
        scores.push(handle.await.unwrap());
    }

    // Same message, same score, whatever runs alongside
    assert!(scores.iter().step_by(2).all(|s| *s == scores[0]));
    assert!(scores.iter().skip(1).step_by(2).all(|s| *s == scores[1]));
    assert!(scores[0] > scores[1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_feeds_keep_every_count() {
    let (classifier, _dir) = setup().await;
    let classifier = Arc::new(classifier);

    let mut handles = Vec::new();
    for _ in 0..40 {
        let classifier = Arc::clone(&classifier);
        handles.push(tokio::spawn(async move {
            classifier.feed(SPAM_MESSAGES[1].as_bytes(), Label::Spam).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(classifier.query("pills").await.unwrap(), Some(TokenStatistics::new(40, 0)));
    assert_eq!(classifier.query("free").await.unwrap(), Some(TokenStatistics::new(40, 0)));
}

#[tokio::test]
async fn test_failed_feed_changes_nothing() {
    let (classifier, _dir) = setup().await;
    classifier.store().set("broken", TokenStatistics::new(1, 0)).await.unwrap();
    sqlx::query("UPDATE word_stats SET counts = 'not numbers' WHERE token = 'broken'")
        .execute(classifier.store().db.as_ref())
        .await
        .unwrap();

    // "alpha" sorts before "broken" and would be written first
    let result = classifier
        .feed(b"Subject: alpha broken zulu\r\n\r\nalpha\r\n", Label::Spam)
        .await;

    assert!(matches!(result, Err(SpamError::InvalidStatistics(_))));
    assert_eq!(classifier.query("alpha").await.unwrap(), None);
    assert_eq!(classifier.query("zulu").await.unwrap(), None);
    assert_eq!(classifier.store().token_count().await.unwrap(), 1);
}
