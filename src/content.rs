//! Content types the engine inspects.
//!
//! Every field is optional so that partially-populated payloads from the
//! Twitter API or the article store still deserialize. The predicates in
//! [`crate::manners`] treat missing fields as grounds for rejection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire format of Twitter's `created_at` field.
const TWITTER_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

// ── Tweets ──────────────────────────────────────────────────────────

/// The author of a tweet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweetUser {
    /// Handle without the leading `@`.
    #[serde(default)]
    pub screen_name: Option<String>,
    /// Numeric user id, as the API's string form.
    #[serde(default)]
    pub id_str: Option<String>,
}

/// A single post under consideration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user: Option<TweetUser>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Tweet {
    /// Build a tweet with text, author handle and language.
    pub fn new(text: &str, screen_name: &str, lang: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            user: Some(TweetUser {
                screen_name: Some(screen_name.to_string()),
                id_str: None,
            }),
            lang: Some(lang.to_string()),
            created_at: None,
        }
    }

    /// Set the author's id.
    pub fn with_user_id(mut self, id_str: &str) -> Self {
        self.user.get_or_insert_with(TweetUser::default).id_str = Some(id_str.to_string());
        self
    }

    /// Set the creation timestamp (raw wire string).
    pub fn with_created_at(mut self, created_at: &str) -> Self {
        self.created_at = Some(created_at.to_string());
        self
    }

    /// Read a post leniently: fields that are absent or of the wrong type
    /// are `None`, so a string `text` survives malformed siblings.
    ///
    /// Returns `None` when the value is not a JSON object at all.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let string = |v: Option<&serde_json::Value>| v.and_then(|v| v.as_str()).map(String::from);
        let user = obj
            .get("user")
            .and_then(|v| v.as_object())
            .map(|user| TweetUser {
                screen_name: string(user.get("screen_name")),
                id_str: string(user.get("id_str")),
            });
        Some(Self {
            text: string(obj.get("text")),
            user,
            lang: string(obj.get("lang")),
            created_at: string(obj.get("created_at")),
        })
    }

    /// Author handle, if present.
    pub fn screen_name(&self) -> Option<&str> {
        self.user.as_ref()?.screen_name.as_deref()
    }

    /// Author id, if present and non-empty.
    pub fn user_id(&self) -> Option<&str> {
        self.user
            .as_ref()?
            .id_str
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Number of `#` characters in the raw text.
    pub fn hashtag_count(&self) -> usize {
        self.text
            .as_deref()
            .map(|t| t.matches('#').count())
            .unwrap_or(0)
    }

    /// Parse `created_at` as either Twitter's wire format or RFC 3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_str(raw, TWITTER_TIME_FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// ── Feed content ────────────────────────────────────────────────────

/// An article returned by a feed, before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedResource {
    pub title: String,
    pub origin: String,
    pub link: String,
}

impl FeedResource {
    /// Whether all three fields are non-empty.
    pub fn is_valid(&self) -> bool {
        crate::manners::validity::is_valid_feed_content_item(&self.title, &self.origin, &self.link)
    }
}

/// An article record read back from the content store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDoc {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub original_link: Option<String>,
}

impl ContentDoc {
    /// Read a document leniently: fields that are absent or not strings are `None`.
    ///
    /// Returns `None` when the value is not a JSON object at all.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |name: &str| obj.get(name).and_then(|v| v.as_str()).map(String::from);
        Some(Self {
            title: field("title"),
            origin: field("origin"),
            original_link: field("original_link"),
        })
    }
}
