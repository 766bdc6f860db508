//! In-process `TrackingStore` backend.
//!
//! Keeps both collections behind a `Mutex`. Suitable for tests and for
//! embedders that do not need state to survive a restart.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::store::traits::{
    THANKED_USERS, ThankedUserRecord, TrackingStore, WELCOMED_USERS, WelcomedUserRecord,
};

#[derive(Debug, Default)]
struct Collections {
    welcomed: Vec<WelcomedUserRecord>,
    thanked: Vec<ThankedUserRecord>,
}

/// Volatile store with the same uniqueness rules as the durable backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Connection("memory store mutex poisoned".into()))
    }
}

#[async_trait]
impl TrackingStore for MemoryStore {
    async fn find_welcomed_user(
        &self,
        user_id: &str,
    ) -> Result<Option<WelcomedUserRecord>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.welcomed.iter().find(|r| r.user_id == user_id).cloned())
    }

    async fn insert_welcomed_user(&self, record: &WelcomedUserRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.welcomed.iter().any(|r| r.user_id == record.user_id) {
            return Err(StoreError::DuplicateKey {
                collection: WELCOMED_USERS.into(),
                key: record.user_id.clone(),
            });
        }
        inner.welcomed.push(record.clone());
        Ok(())
    }

    async fn welcomed_users_by_recency(&self) -> Result<Vec<WelcomedUserRecord>, StoreError> {
        let mut records = self.lock()?.welcomed.clone();
        records.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(records)
    }

    async fn insert_thanked_user(&self, record: &ThankedUserRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.thanked.iter().any(|r| r.username == record.username) {
            return Err(StoreError::DuplicateKey {
                collection: THANKED_USERS.into(),
                key: record.username.clone(),
            });
        }
        inner.thanked.push(record.clone());
        Ok(())
    }

    async fn thanked_usernames(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.thanked.iter().map(|r| r.username.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn welcomed(user_id: &str, minutes_ago: i64) -> WelcomedUserRecord {
        WelcomedUserRecord {
            user_id: user_id.into(),
            time: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn insert_and_find_welcomed() {
        let store = MemoryStore::new();
        store.insert_welcomed_user(&welcomed("1", 0)).await.unwrap();
        assert!(store.find_welcomed_user("1").await.unwrap().is_some());
        assert!(store.find_welcomed_user("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_welcomed_is_conflict() {
        let store = MemoryStore::new();
        store.insert_welcomed_user(&welcomed("1", 5)).await.unwrap();
        let err = store.insert_welcomed_user(&welcomed("1", 0)).await.unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(store.welcomed_users_by_recency().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn welcomed_sorted_most_recent_first() {
        let store = MemoryStore::new();
        store.insert_welcomed_user(&welcomed("old", 60)).await.unwrap();
        store.insert_welcomed_user(&welcomed("new", 1)).await.unwrap();
        store.insert_welcomed_user(&welcomed("mid", 30)).await.unwrap();
        let ids: Vec<String> = store
            .welcomed_users_by_recency()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.user_id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn duplicate_thanked_is_conflict() {
        let store = MemoryStore::new();
        let alice = ThankedUserRecord {
            username: "alice".into(),
        };
        store.insert_thanked_user(&alice).await.unwrap();
        assert!(store.insert_thanked_user(&alice).await.unwrap_err().is_duplicate_key());
        assert_eq!(store.thanked_usernames().await.unwrap(), vec!["alice"]);
    }
}
