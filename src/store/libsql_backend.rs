//! libSQL backend — durable `TrackingStore` implementation.
//!
//! Supports local file and in-memory databases. Uniqueness is enforced by
//! primary keys; constraint violations surface as `StoreError::DuplicateKey`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::{
    THANKED_USERS, ThankedUserRecord, TrackingStore, WELCOMED_USERS, WelcomedUserRecord,
};

/// libSQL tracking store.
///
/// Holds a single connection reused for all operations.
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlStore {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open libSQL database: {e}")))?;

        let store = Self::from_database(db).await?;
        info!(path = %path.display(), "Tracking store opened");
        Ok(store)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StoreError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;
        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;
        migrations::run_migrations(&conn).await?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp, falling back to the epoch minimum.
fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn is_unique_violation(err: &libsql::Error) -> bool {
    err.to_string().contains("UNIQUE constraint failed")
}

/// Map an insert error, distinguishing key conflicts from everything else.
fn map_insert_error(err: libsql::Error, collection: &str, key: &str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::DuplicateKey {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    } else {
        StoreError::Query(format!("insert into {collection}: {err}"))
    }
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl TrackingStore for LibSqlStore {
    async fn find_welcomed_user(
        &self,
        user_id: &str,
    ) -> Result<Option<WelcomedUserRecord>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id, time FROM welcomed_users WHERE user_id = ?1",
                params![user_id],
            )
            .await
            .map_err(|e| StoreError::Query(format!("find_welcomed_user: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("find_welcomed_user row: {e}")))?;

        match row {
            Some(row) => {
                let user_id: String = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("find_welcomed_user parse: {e}")))?;
                let time: String = row.get(1).unwrap_or_default();
                Ok(Some(WelcomedUserRecord {
                    user_id,
                    time: parse_time(&time),
                }))
            }
            None => Ok(None),
        }
    }

    async fn insert_welcomed_user(&self, record: &WelcomedUserRecord) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "INSERT INTO welcomed_users (user_id, time) VALUES (?1, ?2)",
                params![record.user_id.clone(), format_time(&record.time)],
            )
            .await
            .map_err(|e| map_insert_error(e, WELCOMED_USERS, &record.user_id))?;
        Ok(())
    }

    async fn welcomed_users_by_recency(&self) -> Result<Vec<WelcomedUserRecord>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT user_id, time FROM welcomed_users ORDER BY time DESC",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("welcomed_users_by_recency: {e}")))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("welcomed_users_by_recency row: {e}")))?
        {
            match row.get::<String>(0) {
                Ok(user_id) => {
                    let time: String = row.get(1).unwrap_or_default();
                    records.push(WelcomedUserRecord {
                        user_id,
                        time: parse_time(&time),
                    });
                }
                Err(e) => warn!(error = %e, "Skipping unreadable welcomed_users row"),
            }
        }
        Ok(records)
    }

    async fn insert_thanked_user(&self, record: &ThankedUserRecord) -> Result<(), StoreError> {
        self.conn()
            .execute(
                "INSERT INTO thanked_users (username) VALUES (?1)",
                params![record.username.clone()],
            )
            .await
            .map_err(|e| map_insert_error(e, THANKED_USERS, &record.username))?;
        Ok(())
    }

    async fn thanked_usernames(&self) -> Result<Vec<String>, StoreError> {
        let mut rows = self
            .conn()
            .query("SELECT username FROM thanked_users", ())
            .await
            .map_err(|e| StoreError::Query(format!("thanked_usernames: {e}")))?;

        let mut usernames = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("thanked_usernames row: {e}")))?
        {
            match row.get::<String>(0) {
                Ok(username) => usernames.push(username),
                Err(e) => warn!(error = %e, "Skipping unreadable thanked_users row"),
            }
        }
        Ok(usernames)
    }
}
