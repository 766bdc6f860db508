//! "Thank you" intent detection.
//!
//! A post counts as genuine thanks only if it names the bot, mentions an
//! action the bot actually performs, and contains a gratitude term. The
//! action requirement keeps the bot away from sarcastic or unrelated thanks.

use regex::Regex;

use crate::content::Tweet;
use crate::error::ConfigError;
use crate::manners::classifier::normalize;

const ACTION_PATTERN: &str =
    r"(?i)\b(rt|retweet|retweeting|follow|following|help|helping|support)\b";

const GRATITUDE_PATTERN: &str = r"(?i)\b(thanks|thx|ty)\b";

/// Recognizes thank-you replies addressed to the bot.
#[derive(Debug, Clone)]
pub struct ThankYouDetector {
    /// Normalized bot name.
    bot_name: String,
    action: Regex,
    gratitude: Regex,
}

impl ThankYouDetector {
    /// Create a detector for the given bot name.
    ///
    /// An empty or whitespace-only name is rejected; it would match every post.
    pub fn new(bot_name: &str) -> Result<Self, ConfigError> {
        let bot_name = normalize(bot_name);
        if bot_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "bot_name".into(),
                message: "must not be empty".into(),
            });
        }
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                key: "thank_you".into(),
                source,
            })
        };
        Ok(Self {
            bot_name,
            action: compile(ACTION_PATTERN)?,
            gratitude: compile(GRATITUDE_PATTERN)?,
        })
    }

    /// Whether the post is a sincere thank-you aimed at the bot.
    pub fn is_a_thank_you(&self, tweet: &Tweet) -> bool {
        let Some(raw) = tweet.text.as_deref() else {
            return false;
        };
        let text = normalize(raw);
        if !text.contains(self.bot_name.as_str()) {
            return false;
        }
        self.action.is_match(&text) && self.gratitude.is_match(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ThankYouDetector {
        ThankYouDetector::new("bot").unwrap()
    }

    fn tweet(text: &str) -> Tweet {
        Tweet::new(text, "alice", "en")
    }

    #[test]
    fn accepts_thanks_for_rt() {
        assert!(detector().is_a_thank_you(&tweet("thanks @bot for the rt!")));
    }

    #[test]
    fn rejects_thanks_without_action() {
        assert!(!detector().is_a_thank_you(&tweet("thanks @bot")));
    }

    #[test]
    fn rejects_action_without_thanks() {
        assert!(!detector().is_a_thank_you(&tweet("rt @bot")));
    }

    #[test]
    fn rejects_when_bot_not_named() {
        assert!(!detector().is_a_thank_you(&tweet("thanks @someone for the follow")));
    }

    #[test]
    fn rejects_missing_text() {
        assert!(!detector().is_a_thank_you(&Tweet::default()));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(detector().is_a_thank_you(&tweet("THX @Bot for the Support")));
    }

    #[test]
    fn terms_must_be_whole_words() {
        // "type" contains "ty", "helpful" contains "help"
        assert!(!detector().is_a_thank_you(&tweet("@bot what type of helpful thing is this")));
    }

    #[test]
    fn accepts_each_action_form() {
        let d = detector();
        for action in ["retweet", "retweeting", "follow", "following", "help", "helping"] {
            let text = format!("ty @bot for the {action}");
            assert!(d.is_a_thank_you(&tweet(&text)), "expected match for {action}");
        }
    }

    #[test]
    fn blank_bot_name_is_rejected() {
        for name in ["", "   "] {
            let err = ThankYouDetector::new(name).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "bot_name"));
        }
    }

    #[test]
    fn bot_name_is_normalized() {
        let d = ThankYouDetector::new("  HelperBot ").unwrap();
        assert!(d.is_a_thank_you(&tweet("thanks @helperbot for the follow")));
    }
}
