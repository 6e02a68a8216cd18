//! Message tokenizer
//!
//! Splits decoded text into a deduplicated set of lowercase, optionally
//! stemmed tokens. The same input always yields the same set.

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::config::ClassifierConfig;

/// Text tokenizer
pub struct Tokenizer {
    stemmer: Option<Stemmer>,
    min_len: usize,
    max_len: usize,
}

impl Tokenizer {
    /// Create a tokenizer from classifier settings
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            stemmer: config.stemming.then(|| Stemmer::create(Algorithm::English)),
            min_len: config.min_token_len.max(1),
            max_len: config.max_token_len,
        }
    }

    /// Extract the token set of a piece of text
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();
        self.extend(&mut tokens, text);
        tokens
    }

    /// Add the tokens of `text` to an existing set
    ///
    /// Words are split on every non-alphanumeric character, so whitespace and
    /// line terminators never end up in a token.
    pub fn extend(&self, tokens: &mut BTreeSet<String>, text: &str) {
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            let len = word.chars().count();
            if len < self.min_len || len > self.max_len {
                continue;
            }

            let word = word.to_lowercase();
            let token = match &self.stemmer {
                Some(stemmer) => stemmer.stem(&word).into_owned(),
                None => word,
            };
            tokens.insert(token);
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

/// Replace HTML tags and entities with spaces so only the visible text is
/// tokenized.
pub fn strip_html(html: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    static ENTITIES: OnceLock<Regex> = OnceLock::new();

    let tags = TAGS.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)\b.*?</(script|style)\s*>|<!--.*?-->|<[^>]*>")
            .expect("static regex")
    });
    let entities = ENTITIES.get_or_init(|| Regex::new(r"&#?[a-zA-Z0-9]+;").expect("static regex"));

    let text = tags.replace_all(html, " ");
    entities.replace_all(&text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Tokenizer {
        Tokenizer::new(&ClassifierConfig {
            stemming: false,
            ..ClassifierConfig::default()
        })
    }

    #[test]
    fn test_extract_lowercases_and_deduplicates() {
        let tokens = plain().extract("FREE money, free MONEY! Free.");
        let expected: BTreeSet<String> = ["free", "money"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "Quarterly report attached.\r\nPlease review before Monday's meeting.";
        let tokenizer = Tokenizer::default();
        assert_eq!(tokenizer.extract(text), tokenizer.extract(text));
    }

    #[test]
    fn test_line_terminators_never_become_tokens() {
        let tokens = plain().extract("a\nb\r\n\r\n\u{2028}c\n");
        assert!(!tokens.contains("\n"));
        assert!(!tokens.contains("\r"));
        assert!(!tokens.contains("\u{2028}"));
        assert!(tokens.contains("a") && tokens.contains("b") && tokens.contains("c"));
    }

    #[test]
    fn test_length_bounds() {
        let tokenizer = Tokenizer::new(&ClassifierConfig {
            stemming: false,
            min_token_len: 3,
            max_token_len: 5,
            ..ClassifierConfig::default()
        });
        let tokens = tokenizer.extract("ab abc abcde abcdef");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains("abc") && tokens.contains("abcde"));
    }

    #[test]
    fn test_zero_min_length_never_yields_empty_token() {
        let tokenizer = Tokenizer::new(&ClassifierConfig {
            stemming: false,
            min_token_len: 0,
            ..ClassifierConfig::default()
        });
        let tokens = tokenizer.extract("a,,b  \r\n c");
        assert!(!tokens.contains(""));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_stemming_merges_word_forms() {
        let tokens = Tokenizer::default().extract("meeting meetings");
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains("meet"));
    }

    #[test]
    fn test_unicode_words() {
        let tokens = plain().extract("Gratuit! Économisez 50€ aujourd'hui");
        assert!(tokens.contains("économisez"));
        assert!(tokens.contains("50"));
        assert!(tokens.contains("aujourd"));
    }

    #[test]
    fn test_strip_html() {
        let html = "<html><head><style>p { color: red }</style></head>\
                    <body><p>Click&nbsp;<a href=\"http://x\">here</a></p><!-- hidden --></body></html>";
        let tokens = plain().extract(&strip_html(html));
        let expected: BTreeSet<String> = ["click", "here"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tokens, expected);
    }
}
