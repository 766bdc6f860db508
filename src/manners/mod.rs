//! The Manners policy engine.
//!
//! Decides whether inbound posts or outbound bot actions are acceptable and
//! tracks just enough behavior to keep the bot from repeating itself:
//! 1. `classifier` — multi-signal appropriateness checks on a single post
//! 2. `intent` — recognizes thank-you replies addressed to the bot
//! 3. `memory` + `tracker` — recently acted-upon users and durable dedup sets
//!
//! The engine never takes actions itself. Callers report confirmed actions
//! through the `update_*` methods.

pub mod classifier;
pub mod intent;
pub mod memory;
pub mod tracker;
pub mod validity;

use std::sync::Arc;

use tracing::debug;

use crate::config::MannersConfig;
use crate::content::{ContentDoc, Tweet};
use crate::error::ConfigError;
use crate::store::TrackingStore;

pub use classifier::{ContentClassifier, Rejection};
pub use intent::ThankYouDetector;
pub use memory::EngineMemory;
pub use tracker::{ThankedBatchOutcome, WelcomeOutcome};
pub use validity::{is_valid_content_doc, is_valid_feed_content_item};

/// Policy engine instance.
///
/// Owns its [`EngineMemory`]; memory mutators take `&mut self`, so access is
/// serialized by whoever owns the engine.
pub struct Manners {
    config: MannersConfig,
    classifier: ContentClassifier,
    detector: ThankYouDetector,
    memory: EngineMemory,
    store: Arc<dyn TrackingStore>,
}

impl Manners {
    /// Build an engine from configuration and a tracking store.
    ///
    /// The last content source is seeded from a random configured feed.
    pub fn new(config: MannersConfig, store: Arc<dyn TrackingStore>) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = ContentClassifier::from_config(&config)?;
        let detector = ThankYouDetector::new(&config.bot_name)?;
        let memory = EngineMemory::seeded(&config.feeds);
        debug!(
            bot = %config.bot_name,
            last_source = memory.last_source().unwrap_or("<none>"),
            "Manners engine initialized"
        );
        Ok(Self {
            config,
            classifier,
            detector,
            memory,
            store,
        })
    }

    pub fn config(&self) -> &MannersConfig {
        &self.config
    }

    pub fn memory(&self) -> &EngineMemory {
        &self.memory
    }

    // ── Classification ──────────────────────────────────────────────

    /// Whether a post is quality content the bot may act upon.
    pub fn is_appropriate(&self, tweet: &Tweet) -> bool {
        self.classifier
            .is_appropriate(tweet, self.memory.last_retweeted_user())
    }

    /// The first signal that disqualifies a post, if any.
    pub fn evaluate(&self, tweet: &Tweet) -> Option<Rejection> {
        self.classifier
            .evaluate(tweet, self.memory.last_retweeted_user())
    }

    /// Whether a post mentions a target keyword.
    pub fn is_appropriate_for_retweeting(&self, tweet: &Tweet) -> bool {
        self.classifier.is_appropriate_for_retweeting(tweet)
    }

    /// Whether a post sincerely thanks the bot for an action.
    pub fn is_a_thank_you(&self, tweet: &Tweet) -> bool {
        self.detector.is_a_thank_you(tweet)
    }

    /// Whether a feed resource is usable.
    pub fn is_a_valid_feed_content_item(&self, title: &str, origin: &str, link: &str) -> bool {
        is_valid_feed_content_item(title, origin, link)
    }

    /// Whether a stored content document is usable.
    pub fn is_a_valid_content_doc(&self, doc: Option<&ContentDoc>) -> bool {
        is_valid_content_doc(doc)
    }

    // ── Engine memory ───────────────────────────────────────────────

    pub fn update_last_retweeted_user(&mut self, screen_name: impl Into<String>) {
        self.memory.update_last_retweeted_user(screen_name);
    }

    pub fn update_last_favorited_user(&mut self, screen_name: impl Into<String>) {
        self.memory.update_last_favorited_user(screen_name);
    }

    pub fn update_last_thanked_user(&mut self, screen_name: impl Into<String>) {
        self.memory.update_last_thanked_user(screen_name);
    }

    pub fn update_last_welcomed_user(&mut self, screen_name: impl Into<String>) {
        self.memory.update_last_welcomed_user(screen_name);
    }

    pub fn update_last_source(&mut self, source: impl Into<String>) {
        self.memory.update_last_source(source);
    }

    pub fn last_retweeted_user(&self) -> Option<&str> {
        self.memory.last_retweeted_user()
    }

    pub fn last_favorited_user(&self) -> Option<&str> {
        self.memory.last_favorited_user()
    }

    pub fn last_thanked_user(&self) -> Option<&str> {
        self.memory.last_thanked_user()
    }

    pub fn last_thanked_users(&self) -> &[String] {
        self.memory.last_thanked_users()
    }

    pub fn last_welcomed_user(&self) -> Option<&str> {
        self.memory.last_welcomed_user()
    }

    pub fn last_source(&self) -> Option<&str> {
        self.memory.last_source()
    }
}
