//! Process-lifetime engine memory.
//!
//! Plain fields with no synchronization. Callers update a field exactly when
//! the corresponding action has been confirmed; the engine never checks.

use rand::seq::SliceRandom;

/// Recently acted-upon users and the last content source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineMemory {
    last_retweeted_user: Option<String>,
    last_favorited_user: Option<String>,
    last_thanked_user: Option<String>,
    last_thanked_users: Vec<String>,
    last_welcomed_user: Option<String>,
    last_source: Option<String>,
}

impl EngineMemory {
    /// Seed memory with a source picked at random from `sources`.
    ///
    /// The last retweeted user starts absent, which never equals a real handle.
    pub fn seeded(sources: &[String]) -> Self {
        Self {
            last_source: sources.choose(&mut rand::thread_rng()).cloned(),
            ..Self::default()
        }
    }

    pub fn update_last_retweeted_user(&mut self, screen_name: impl Into<String>) {
        self.last_retweeted_user = Some(screen_name.into());
    }

    pub fn update_last_favorited_user(&mut self, screen_name: impl Into<String>) {
        self.last_favorited_user = Some(screen_name.into());
    }

    pub fn update_last_thanked_user(&mut self, screen_name: impl Into<String>) {
        self.last_thanked_user = Some(screen_name.into());
    }

    /// Replace the last thanked batch.
    pub fn update_last_thanked_users(&mut self, screen_names: Vec<String>) {
        self.last_thanked_users = screen_names;
    }

    pub fn update_last_welcomed_user(&mut self, screen_name: impl Into<String>) {
        self.last_welcomed_user = Some(screen_name.into());
    }

    /// Record the source whose article was just posted.
    pub fn update_last_source(&mut self, source: impl Into<String>) {
        self.last_source = Some(source.into());
    }

    pub fn last_retweeted_user(&self) -> Option<&str> {
        self.last_retweeted_user.as_deref()
    }

    pub fn last_favorited_user(&self) -> Option<&str> {
        self.last_favorited_user.as_deref()
    }

    pub fn last_thanked_user(&self) -> Option<&str> {
        self.last_thanked_user.as_deref()
    }

    pub fn last_thanked_users(&self) -> &[String] {
        &self.last_thanked_users
    }

    pub fn last_welcomed_user(&self) -> Option<&str> {
        self.last_welcomed_user.as_deref()
    }

    pub fn last_source(&self) -> Option<&str> {
        self.last_source.as_deref()
    }
}
