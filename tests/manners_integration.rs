//! End-to-end tests for the Manners engine.
//!
//! Each scenario runs against both store backends: the in-process
//! `MemoryStore` and an on-disk `LibSqlStore` in a temp directory.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use manners::store::{LibSqlStore, MemoryStore, TrackingStore};
use manners::{Manners, MannersConfig, MannersError, Rejection, Tweet, WelcomeOutcome};

const CONFIG_JSON: &str = r#"{
    "bot_name": "NeighborBot",
    "accepted_language": "en",
    "users_to_ignore": ["SpamAccount"],
    "retweet_disqualifiers": ["ass", "giveaway"],
    "target_keywords": ["garden", "volunteer"],
    "feeds": ["hn", "lobsters", "local-news"]
}"#;

fn config() -> MannersConfig {
    MannersConfig::from_json_str(CONFIG_JSON).unwrap()
}

/// Both backends; the `TempDir` must outlive the libSQL store.
async fn backends() -> Vec<(&'static str, Arc<dyn TrackingStore>, Option<TempDir>)> {
    let tmp = tempfile::tempdir().unwrap();
    let libsql = LibSqlStore::new_local(&tmp.path().join("manners.db"))
        .await
        .unwrap();
    let memory: Arc<dyn TrackingStore> = Arc::new(MemoryStore::new());
    let libsql: Arc<dyn TrackingStore> = Arc::new(libsql);
    vec![("memory", memory, None), ("libsql", libsql, Some(tmp))]
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn classifies_a_stream_of_posts() {
    let mut engine = Manners::new(config(), Arc::new(MemoryStore::new())).unwrap();

    let good = Tweet::new(
        "Our community garden needs a volunteer for Sunday watering duty",
        "alice",
        "en",
    );
    assert!(engine.is_appropriate(&good));
    assert!(engine.is_appropriate_for_retweeting(&good));

    engine.update_last_retweeted_user("ALICE");
    assert!(matches!(
        engine.evaluate(&good),
        Some(Rejection::RepeatUser { .. })
    ));

    let short = Tweet::new("too short", "bob", "en");
    assert!(!engine.is_appropriate(&short));

    let spammy = Tweet::new(
        "Check out my garden photos #garden #plants #green #spring",
        "bob",
        "en",
    );
    assert!(!engine.is_appropriate(&spammy));

    let ignored = Tweet::new(
        "A perfectly pleasant message about the weather this week",
        "spamaccount",
        "en",
    );
    assert!(matches!(
        engine.evaluate(&ignored),
        Some(Rejection::IgnoredUser { .. })
    ));

    let classic = Tweet::new(
        "A classic guide to companion planting for small backyard beds",
        "carol",
        "en",
    );
    assert!(engine.is_appropriate(&classic));

    let rude = Tweet::new(
        "Whoever parked there is an ass and blocked the whole street",
        "dave",
        "en",
    );
    assert!(!engine.is_appropriate(&rude));
}

#[tokio::test]
async fn detects_thank_yous() {
    let engine = Manners::new(config(), Arc::new(MemoryStore::new())).unwrap();
    let thanks = |text: &str| engine.is_a_thank_you(&Tweet::new(text, "someone", "en"));

    assert!(thanks("Thanks @NeighborBot for the RT!"));
    assert!(thanks("thx @neighborbot for following me"));
    assert!(!thanks("thanks @neighborbot"));
    assert!(!thanks("rt @neighborbot"));
    assert!(!thanks("thanks @otherbot for the retweet"));
}

#[tokio::test]
async fn welcome_tracking_is_idempotent_and_ordered() {
    for (name, store, _tmp) in backends().await {
        let engine = Manners::new(config(), store).unwrap();

        let first = Tweet::new("hi", "alice", "en")
            .with_user_id("100")
            .with_created_at("Tue Mar 05 09:00:00 +0000 2019");
        let second = Tweet::new("hello", "bob", "en")
            .with_user_id("200")
            .with_created_at("Tue Mar 05 10:00:00 +0000 2019");

        assert_eq!(
            engine.add_welcomed_user(&first).await.unwrap(),
            WelcomeOutcome::Recorded,
            "{name}"
        );
        assert_eq!(
            engine.add_welcomed_user(&second).await.unwrap(),
            WelcomeOutcome::Recorded,
            "{name}"
        );
        assert_eq!(
            engine.add_welcomed_user(&first).await.unwrap(),
            WelcomeOutcome::AlreadyWelcomed,
            "{name}"
        );

        assert_eq!(
            engine.get_welcomed_users().await.unwrap(),
            vec!["200", "100"],
            "{name}"
        );
        assert!(engine.user_has_been_thanked(Some("100")).await.unwrap(), "{name}");
        assert!(!engine.user_has_been_thanked(Some("300")).await.unwrap(), "{name}");
        assert!(matches!(
            engine.user_has_been_thanked(None).await,
            Err(MannersError::MissingArgument { .. })
        ));
    }
}

#[tokio::test]
async fn thank_you_dedup_gate() {
    for (name, store, _tmp) in backends().await {
        let mut engine = Manners::new(config(), store).unwrap();

        engine
            .update_last_thanked_users(names(&["alice"]))
            .await
            .unwrap();

        let candidates = names(&["alice", "bob"]);
        let fresh = engine.filter_retweeters_to_thank(&candidates).await.unwrap();
        assert_eq!(fresh, names(&["bob"]), "{name}");

        let outcome = engine
            .update_last_thanked_users(names(&["alice", "bob"]))
            .await
            .unwrap();
        assert_eq!(outcome.recorded, names(&["bob"]), "{name}");
        assert_eq!(outcome.skipped, names(&["alice"]), "{name}");
        assert_eq!(engine.last_thanked_users(), names(&["alice", "bob"]));

        assert!(
            engine
                .filter_retweeters_to_thank(&candidates)
                .await
                .unwrap()
                .is_empty(),
            "{name}"
        );
    }
}

#[tokio::test]
async fn dedup_state_survives_engine_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("manners.db");

    {
        let store = Arc::new(LibSqlStore::new_local(&path).await.unwrap());
        let mut engine = Manners::new(config(), store).unwrap();
        engine
            .update_last_thanked_users(names(&["alice"]))
            .await
            .unwrap();
    }

    let store = Arc::new(LibSqlStore::new_local(&path).await.unwrap());
    let engine = Manners::new(config(), store).unwrap();
    assert!(engine.last_thanked_users().is_empty());
    let fresh = engine
        .filter_retweeters_to_thank(&names(&["alice", "bob"]))
        .await
        .unwrap();
    assert_eq!(fresh, names(&["bob"]));
}

#[tokio::test]
async fn filters_raw_search_payloads() {
    let engine = Manners::new(config(), Arc::new(MemoryStore::new())).unwrap();

    assert!(engine.filter_search_payload(&json!(null)).is_empty());
    assert!(engine.filter_search_payload(&json!({"statuses": []})).is_empty());

    let payload = json!([
        {"text": "Join the garden volunteer day", "user": {"screen_name": "alice"}, "lang": "en"},
        {"text": "Huge giveaway, click now", "user": {"screen_name": "bot123"}, "lang": "en"},
        {"text": "Brass band plays the park tonight", "user": {"screen_name": "carol"}, "lang": "en"},
        {"lang": "en"}
    ]);
    let kept: Vec<_> = engine
        .filter_search_payload(&payload)
        .into_iter()
        .filter_map(|t| t.screen_name().map(String::from))
        .collect();
    // "Brass" contains "ass" as a substring, so the coarse filter drops it too
    assert_eq!(kept, vec!["alice"]);
}

#[tokio::test]
async fn initial_source_comes_from_configured_feeds() {
    let engine = Manners::new(config(), Arc::new(MemoryStore::new())).unwrap();
    let source = engine.last_source().unwrap();
    assert!(["hn", "lobsters", "local-news"].contains(&source));
}
