//! Manners — a policy engine for social bots.
//!
//! Decides whether incoming posts deserve attention and whether outgoing
//! thank-you or welcome actions would repeat themselves.

pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod manners;
pub mod store;

pub use config::MannersConfig;
pub use content::{ContentDoc, FeedResource, Tweet, TweetUser};
pub use error::{ConfigError, Error, MannersError, Result, StoreError};
pub use manners::{Manners, Rejection, ThankedBatchOutcome, WelcomeOutcome};
