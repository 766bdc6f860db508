//! Configuration types.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Settings consumed by the Manners engine.
///
/// Mirrors the `twitter`, `bot` and `scraper` sections of the bot's JSON
/// configuration, flattened into one struct. Missing keys fall back to
/// [`MannersConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MannersConfig {
    /// Display name the bot is addressed by.
    pub bot_name: String,
    /// Language tag a post must carry to be acted upon.
    pub accepted_language: String,
    /// Posts must be strictly longer than this many characters.
    pub min_text_length: usize,
    /// Posts with at least this many `#` characters are spam.
    pub hashtag_spam_threshold: usize,
    /// Handles whose content is never acted upon.
    pub users_to_ignore: Vec<String>,
    /// Terms that disqualify a post.
    pub retweet_disqualifiers: Vec<String>,
    /// Keywords that make a post worth promoting.
    pub target_keywords: Vec<String>,
    /// Content source identifiers known to the scraper.
    pub feeds: Vec<String>,
}

impl Default for MannersConfig {
    fn default() -> Self {
        Self {
            bot_name: "manners".to_string(),
            accepted_language: "en".to_string(),
            min_text_length: 40,
            hashtag_spam_threshold: 4,
            users_to_ignore: Vec::new(),
            retweet_disqualifiers: Vec::new(),
            target_keywords: Vec::new(),
            feeds: Vec::new(),
        }
    }
}

impl MannersConfig {
    /// Parse a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file and apply `MANNERS_*` overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let mut config = Self::from_json_str(&raw)?;
        config.apply_env();
        config.validate()?;
        debug!(path = %path.display(), "Manners configuration loaded");
        Ok(config)
    }

    /// Override scalar settings from the environment.
    ///
    /// `MANNERS_BOT_NAME`, `MANNERS_LANGUAGE`, `MANNERS_MIN_TEXT_LENGTH` and
    /// `MANNERS_HASHTAG_THRESHOLD` are honoured; unparseable numbers are
    /// ignored.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("MANNERS_BOT_NAME") {
            self.bot_name = name;
        }
        if let Some(lang) = lookup("MANNERS_LANGUAGE") {
            self.accepted_language = lang;
        }
        if let Some(len) = lookup("MANNERS_MIN_TEXT_LENGTH").and_then(|v| v.parse().ok()) {
            self.min_text_length = len;
        }
        if let Some(n) = lookup("MANNERS_HASHTAG_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.hashtag_spam_threshold = n;
        }
    }

    /// Check invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "bot_name".into(),
                message: "must not be empty".into(),
            });
        }
        if self.accepted_language.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "accepted_language".into(),
                message: "must not be empty".into(),
            });
        }
        if self.min_text_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "min_text_length".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.hashtag_spam_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                key: "hashtag_spam_threshold".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
