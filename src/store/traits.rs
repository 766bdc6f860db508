//! `TrackingStore` trait — async interface for durable dedup state.
//!
//! Two collections back the engine: welcomed users keyed by author id and
//! thanked users keyed by username. Backends report unique-key conflicts as
//! [`StoreError::DuplicateKey`] so the engine can absorb them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Collection name for welcomed-user records.
pub const WELCOMED_USERS: &str = "welcomed_users";

/// Collection name for thanked-user records.
pub const THANKED_USERS: &str = "thanked_users";

/// A user the bot has sent a "welcome" to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomedUserRecord {
    /// Author id; unique in the collection.
    pub user_id: String,
    /// Timestamp of the post that triggered the welcome.
    pub time: DateTime<Utc>,
}

/// A user the bot has thanked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThankedUserRecord {
    /// Handle; unique in the collection.
    pub username: String,
}

/// Backend-agnostic store for welcomed and thanked users.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    // ── Welcomed users ──────────────────────────────────────────────

    /// Look up a welcomed user by author id.
    async fn find_welcomed_user(
        &self,
        user_id: &str,
    ) -> Result<Option<WelcomedUserRecord>, StoreError>;

    /// Insert a welcomed user. Fails with `DuplicateKey` if the id exists.
    async fn insert_welcomed_user(&self, record: &WelcomedUserRecord) -> Result<(), StoreError>;

    /// All welcomed users, most recent `time` first.
    async fn welcomed_users_by_recency(&self) -> Result<Vec<WelcomedUserRecord>, StoreError>;

    // ── Thanked users ───────────────────────────────────────────────

    /// Insert a thanked user. Fails with `DuplicateKey` if the name exists.
    async fn insert_thanked_user(&self, record: &ThankedUserRecord) -> Result<(), StoreError>;

    /// Every username ever thanked.
    async fn thanked_usernames(&self) -> Result<Vec<String>, StoreError>;
}
