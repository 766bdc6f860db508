//! Content-appropriateness classifier.
//!
//! Runs a fixed sequence of disqualifying signals over a post and stops at
//! the first one that fires:
//! - too many hashtags → spam
//! - same author as the last retweet → repeat
//! - wrong language tag
//! - text too short
//! - author on the ignore list
//! - whole-word disqualifier term in the text
//!
//! Missing text, author or language never errors; the post is rejected.

use regex::Regex;
use tracing::warn;

use crate::config::MannersConfig;
use crate::content::Tweet;
use crate::error::ConfigError;

/// Lower-case and trim, the normalization every text check shares.
pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Why a post was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The post has no text.
    MissingText,
    /// The post has no author handle.
    MissingAuthor,
    /// Hashtag count reached the spam threshold.
    HashtagSpam { count: usize },
    /// The author was the last one retweeted.
    RepeatUser { author: String },
    /// Language tag absent or not the accepted one.
    WrongLanguage { lang: Option<String> },
    /// Text not longer than the minimum length.
    TooShort { length: usize },
    /// Author is on the ignore list.
    IgnoredUser { author: String },
    /// A disqualifier term appears as a whole word.
    Disqualified { term: String },
}

impl Rejection {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingText => "missing_text",
            Self::MissingAuthor => "missing_author",
            Self::HashtagSpam { .. } => "hashtag_spam",
            Self::RepeatUser { .. } => "repeat_user",
            Self::WrongLanguage { .. } => "wrong_language",
            Self::TooShort { .. } => "too_short",
            Self::IgnoredUser { .. } => "ignored_user",
            Self::Disqualified { .. } => "disqualified",
        }
    }
}

/// A disqualifier term with its compiled whole-word pattern.
#[derive(Debug, Clone)]
struct Disqualifier {
    term: String,
    regex: Regex,
}

/// Compiled, configuration-derived classifier.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    accepted_language: String,
    min_text_length: usize,
    hashtag_spam_threshold: usize,
    /// Normalized ignored handles.
    users_to_ignore: Vec<String>,
    disqualifiers: Vec<Disqualifier>,
    /// Raw terms for the coarse substring filter.
    disqualifier_terms: Vec<String>,
    /// Normalized target keywords.
    target_keywords: Vec<String>,
}

impl ContentClassifier {
    /// Compile the classifier from configuration.
    pub fn from_config(config: &MannersConfig) -> Result<Self, ConfigError> {
        let disqualifiers = config
            .retweet_disqualifiers
            .iter()
            .filter(|term| !term.trim().is_empty())
            .map(|term| -> Result<Disqualifier, ConfigError> {
                let term = normalize(term);
                let regex = Regex::new(&format!(r"\b{}\b", regex::escape(&term))).map_err(
                    |source| ConfigError::InvalidPattern {
                        key: "retweet_disqualifiers".into(),
                        source,
                    },
                )?;
                Ok(Disqualifier { term, regex })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            accepted_language: config.accepted_language.clone(),
            min_text_length: config.min_text_length,
            hashtag_spam_threshold: config.hashtag_spam_threshold,
            users_to_ignore: config.users_to_ignore.iter().map(|u| normalize(u)).collect(),
            disqualifiers,
            disqualifier_terms: config
                .retweet_disqualifiers
                .iter()
                .filter(|term| !term.is_empty())
                .cloned()
                .collect(),
            target_keywords: config
                .target_keywords
                .iter()
                .map(|k| normalize(k))
                .filter(|k| !k.is_empty())
                .collect(),
        })
    }

    /// Evaluate a post against every signal.
    ///
    /// Returns `Some(Rejection)` for the first signal that fires, `None` if
    /// the post is acceptable.
    pub fn evaluate(&self, tweet: &Tweet, last_retweeted: Option<&str>) -> Option<Rejection> {
        let rejection = self.first_rejection(tweet, last_retweeted)?;
        warn!(
            author = tweet.screen_name().unwrap_or("<unknown>"),
            reason = rejection.label(),
            detail = ?rejection,
            "Skipping inappropriate content"
        );
        Some(rejection)
    }

    /// Whether the post passes every signal.
    pub fn is_appropriate(&self, tweet: &Tweet, last_retweeted: Option<&str>) -> bool {
        self.evaluate(tweet, last_retweeted).is_none()
    }

    fn first_rejection(&self, tweet: &Tweet, last_retweeted: Option<&str>) -> Option<Rejection> {
        let Some(raw) = tweet.text.as_deref() else {
            return Some(Rejection::MissingText);
        };
        let Some(author) = tweet.screen_name() else {
            return Some(Rejection::MissingAuthor);
        };
        let author_key = normalize(author);

        let count = tweet.hashtag_count();
        if count >= self.hashtag_spam_threshold {
            return Some(Rejection::HashtagSpam { count });
        }

        if last_retweeted.is_some_and(|last| normalize(last) == author_key) {
            return Some(Rejection::RepeatUser {
                author: author.to_string(),
            });
        }

        if tweet.lang.as_deref() != Some(self.accepted_language.as_str()) {
            return Some(Rejection::WrongLanguage {
                lang: tweet.lang.clone(),
            });
        }

        let length = raw.chars().count();
        if length <= self.min_text_length {
            return Some(Rejection::TooShort { length });
        }

        if self.users_to_ignore.contains(&author_key) {
            return Some(Rejection::IgnoredUser {
                author: author.to_string(),
            });
        }

        let text = normalize(raw);
        self.disqualifiers
            .iter()
            .find(|d| d.regex.is_match(&text))
            .map(|d| Rejection::Disqualified {
                term: d.term.clone(),
            })
    }

    /// Whether the post mentions any target keyword (plain substring).
    pub fn is_appropriate_for_retweeting(&self, tweet: &Tweet) -> bool {
        let Some(raw) = tweet.text.as_deref() else {
            return false;
        };
        let text = normalize(raw);
        self.target_keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Whether raw text contains any disqualifier as a plain substring.
    ///
    /// Coarser than [`Self::evaluate`]; used for first-pass filtering of
    /// search results.
    pub fn contains_disqualifier_substring(&self, text: &str) -> bool {
        self.disqualifier_terms
            .iter()
            .any(|term| text.contains(term.as_str()))
    }
}
