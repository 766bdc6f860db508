//! Durable dedup tracking for thank-you and welcome actions.
//!
//! Store conflicts on insert are the normal "already recorded" case and are
//! absorbed. Every other store error reaches the caller unchanged, once.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, error, info};

use super::Manners;
use crate::content::Tweet;
use crate::error::MannersError;
use crate::store::{ThankedUserRecord, WelcomedUserRecord};

/// Result of recording a welcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeOutcome {
    /// A new record was written.
    Recorded,
    /// The author was already welcomed; nothing was written.
    AlreadyWelcomed,
}

/// Result of recording a batch of thanked users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThankedBatchOutcome {
    /// Handles newly written to the store.
    pub recorded: Vec<String>,
    /// Handles the store already knew about.
    pub skipped: Vec<String>,
}

impl Manners {
    /// Whether the author id is in the welcomed set.
    pub async fn user_has_been_thanked(&self, user_id: Option<&str>) -> Result<bool, MannersError> {
        let user_id = user_id
            .filter(|id| !id.is_empty())
            .ok_or(MannersError::MissingArgument {
                operation: "user_has_been_thanked",
                argument: "user_id",
            })?;

        let record = self.store.find_welcomed_user(user_id).await.map_err(|e| {
            error!(user_id, error = %e, "Failed to look up welcomed user");
            e
        })?;
        Ok(record.is_some())
    }

    /// Record that the post's author has received a welcome.
    ///
    /// The post's `created_at` becomes the record time; when it is missing or
    /// unparseable the current time is used.
    pub async fn add_welcomed_user(&self, tweet: &Tweet) -> Result<WelcomeOutcome, MannersError> {
        let user_id = tweet.user_id().ok_or_else(|| {
            error!("add_welcomed_user: could not find tweeting user id_str");
            MannersError::MissingArgument {
                operation: "add_welcomed_user",
                argument: "user.id_str",
            }
        })?;

        let time = tweet.created_at_utc().unwrap_or_else(|| {
            debug!(user_id, "No usable created_at, recording welcome at current time");
            Utc::now()
        });
        let record = WelcomedUserRecord {
            user_id: user_id.to_string(),
            time,
        };

        match self.store.insert_welcomed_user(&record).await {
            Ok(()) => {
                info!(user_id, "Recorded welcomed user");
                Ok(WelcomeOutcome::Recorded)
            }
            Err(e) if e.is_duplicate_key() => {
                info!(user_id, "User already welcomed, record not written");
                Ok(WelcomeOutcome::AlreadyWelcomed)
            }
            Err(e) => {
                error!(user_id, error = %e, "Failed to record welcomed user");
                Err(e.into())
            }
        }
    }

    /// Replace the in-memory thanked batch and record each handle durably.
    ///
    /// Handles already present in the store are skipped individually; the
    /// rest of the batch is still written.
    pub async fn update_last_thanked_users(
        &mut self,
        users: Vec<String>,
    ) -> Result<ThankedBatchOutcome, MannersError> {
        self.memory.update_last_thanked_users(users.clone());

        let mut outcome = ThankedBatchOutcome::default();
        for username in users {
            let record = ThankedUserRecord {
                username: username.clone(),
            };
            match self.store.insert_thanked_user(&record).await {
                Ok(()) => outcome.recorded.push(username),
                Err(e) if e.is_duplicate_key() => {
                    info!(%username, "thanked_users already has this user, record not written");
                    outcome.skipped.push(username);
                }
                Err(e) => {
                    error!(%username, error = %e, "Failed to record thanked user");
                    return Err(e.into());
                }
            }
        }

        info!(
            recorded = outcome.recorded.len(),
            skipped = outcome.skipped.len(),
            "Updated thanked_users"
        );
        Ok(outcome)
    }

    /// Author ids of welcomed users, most recently welcomed first.
    pub async fn get_welcomed_users(&self) -> Result<Vec<String>, MannersError> {
        let records = self.store.welcomed_users_by_recency().await.map_err(|e| {
            error!(error = %e, "Failed to list welcomed users");
            e
        })?;
        debug!(count = records.len(), "Retrieved welcomed users");
        Ok(records.into_iter().map(|r| r.user_id).collect())
    }

    /// Drop candidates that have already been thanked, keeping order.
    pub async fn filter_retweeters_to_thank(
        &self,
        candidates: &[String],
    ) -> Result<Vec<String>, MannersError> {
        let thanked: HashSet<String> = self
            .store
            .thanked_usernames()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list thanked users");
                e
            })?
            .into_iter()
            .collect();

        Ok(candidates
            .iter()
            .filter(|candidate| !thanked.contains(candidate.as_str()))
            .cloned()
            .collect())
    }

    /// Keep search results whose text contains no disqualifier substring.
    ///
    /// Posts without text are dropped.
    pub fn filter_search_results(&self, tweets: &[Tweet]) -> Vec<Tweet> {
        tweets
            .iter()
            .filter(|tweet| {
                tweet
                    .text
                    .as_deref()
                    .is_some_and(|text| !self.classifier.contains_disqualifier_substring(text))
            })
            .cloned()
            .collect()
    }

    /// Filter a raw search payload.
    ///
    /// Anything other than a non-empty JSON array yields an empty list.
    /// Elements that are not objects with string text are dropped; other
    /// fields of the wrong type are ignored.
    pub fn filter_search_payload(&self, payload: &serde_json::Value) -> Vec<Tweet> {
        let Some(items) = payload.as_array() else {
            return Vec::new();
        };
        let tweets: Vec<Tweet> = items.iter().filter_map(Tweet::from_value).collect();
        self.filter_search_results(&tweets)
    }
}
