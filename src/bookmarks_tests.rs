use super::*;
use crate::storage::MemoryStore;
use async_trait::async_trait;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

/// Memory store whose reads or writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                source: io::Error::other("disk unavailable"),
            });
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                source: io::Error::other("disk full"),
            });
        }
        self.inner.set(key, value).await
    }
}

fn create_test_store() -> BookmarkStore<MemoryStore> {
    BookmarkStore::new(MemoryStore::new())
}

fn article(id: &str) -> Article {
    let mut article = Article::new(id).with_title(format!("Title {}", id));
    article.source_id = Some("example".to_string());
    article.link = Some(format!("https://example.com/{}", id));
    article
}

#[tokio::test]
async fn test_empty_store() {
    let store = create_test_store();

    assert!(store.get_all().await.is_empty());
    assert!(!store.is_bookmarked("anything").await);
}

#[tokio::test]
async fn test_toggle_twice_restores_list() {
    let store = create_test_store();
    store.toggle(&article("a0")).await;
    let before = store.get_all().await;

    assert_eq!(store.toggle(&article("a1")).await, ToggleOutcome::NowBookmarked);
    assert!(store.is_bookmarked("a1").await);

    assert_eq!(store.toggle(&article("a1")).await, ToggleOutcome::NowUnbookmarked);
    assert!(!store.is_bookmarked("a1").await);

    assert_eq!(store.get_all().await, before);
}

#[tokio::test]
async fn test_append_and_remove_keep_order() {
    let store = create_test_store();
    for id in ["a1", "a2", "a3"] {
        assert!(store.toggle_bookmark(&article(id)).await);
    }

    let ids: Vec<_> = store.get_all().await.into_iter().map(|a| a.article_id).collect();
    assert_eq!(ids, ["a1", "a2", "a3"]);

    assert!(!store.toggle_bookmark(&article("a2")).await);
    let ids: Vec<_> = store.get_all().await.into_iter().map(|a| a.article_id).collect();
    assert_eq!(ids, ["a1", "a3"]);
}

#[tokio::test]
async fn test_full_record_is_stored() {
    let store = create_test_store();
    let mut original = article("a1");
    original.content = Some("Body".to_string());
    assert!(original.insert_extra("category", serde_json::json!(["top"])));

    store.toggle(&original).await;

    assert_eq!(store.get_all().await, vec![original]);
}

#[tokio::test]
async fn test_removes_every_duplicate() {
    let store = create_test_store();
    let duplicated = serde_json::to_string(&vec![article("a1"), article("a2"), article("a1")]).unwrap();
    store.storage().set(BOOKMARKS_KEY, duplicated).await.unwrap();

    assert_eq!(store.toggle(&article("a1")).await, ToggleOutcome::NowUnbookmarked);
    assert_eq!(store.get_all().await, vec![article("a2")]);
}

#[tokio::test]
async fn test_membership_uses_id_only() {
    let store = create_test_store();
    store.toggle(&article("a1")).await;

    // Same id, different contents: still the same bookmark.
    let changed = Article::new("a1").with_title("Edited upstream");
    assert_eq!(store.toggle(&changed).await, ToggleOutcome::NowUnbookmarked);
    assert!(store.get_all().await.is_empty());
}

#[tokio::test]
async fn test_undecodable_value_reads_as_empty() {
    let store = create_test_store();
    store
        .storage()
        .set(BOOKMARKS_KEY, "{not json".to_string())
        .await
        .unwrap();

    assert!(store.get_all().await.is_empty());
    assert!(!store.is_bookmarked("a1").await);

    // A toggle starts over from the empty list.
    assert_eq!(store.toggle(&article("a1")).await, ToggleOutcome::NowBookmarked);
    assert_eq!(store.get_all().await, vec![article("a1")]);
}

#[tokio::test]
async fn test_malformed_record_does_not_hide_the_rest() {
    let store = create_test_store();
    let stored = serde_json::json!([
        {"article_id": "a1", "title": "Title a1"},
        {"article_id": 7, "title": "numeric id"},
        {"article_id": "a3", "title": "Title a3"}
    ]);
    store
        .storage()
        .set(BOOKMARKS_KEY, stored.to_string())
        .await
        .unwrap();

    let ids: Vec<_> = store.get_all().await.into_iter().map(|a| a.article_id).collect();
    assert_eq!(ids, ["a1", "a3"]);
    assert!(store.is_bookmarked("a1").await);
    assert!(store.is_bookmarked("a3").await);

    assert_eq!(store.toggle(&article("a9")).await, ToggleOutcome::NowBookmarked);
    let ids: Vec<_> = store.get_all().await.into_iter().map(|a| a.article_id).collect();
    assert_eq!(ids, ["a1", "a3", "a9"]);
}

#[tokio::test]
async fn test_extra_cannot_shadow_modelled_fields() {
    let store = create_test_store();
    store.toggle(&article("a1")).await;

    let mut shadowing = article("a2");
    shadowing.pub_date = Some("2024-01-01 00:00:00".to_string());
    assert!(!shadowing.insert_extra("pubDate", serde_json::json!("1999-01-01 00:00:00")));

    assert_eq!(store.toggle(&shadowing).await, ToggleOutcome::NowBookmarked);
    assert_eq!(store.get_all().await, vec![article("a1"), shadowing]);
}

#[tokio::test]
async fn test_failed_write_keeps_previous_value() {
    let store = BookmarkStore::new(FlakyStore::default());
    store.toggle(&article("a1")).await;

    store.storage().fail_writes.store(true, Ordering::SeqCst);
    assert_eq!(store.toggle(&article("a2")).await, ToggleOutcome::Failed);
    assert!(!store.toggle_bookmark(&article("a2")).await);
    assert!(!store.toggle_bookmark(&article("a1")).await);

    store.storage().fail_writes.store(false, Ordering::SeqCst);
    assert_eq!(store.get_all().await, vec![article("a1")]);
}

#[tokio::test]
async fn test_failed_read_does_not_write() {
    let store = BookmarkStore::new(FlakyStore::default());
    store.toggle(&article("a1")).await;

    store.storage().fail_reads.store(true, Ordering::SeqCst);
    assert!(store.get_all().await.is_empty());
    assert_eq!(store.toggle(&article("a2")).await, ToggleOutcome::Failed);

    store.storage().fail_reads.store(false, Ordering::SeqCst);
    assert_eq!(store.get_all().await, vec![article("a1")]);
}

#[tokio::test]
async fn test_custom_key_is_isolated() {
    let store = BookmarkStore::with_key(MemoryStore::new(), "@other");
    store.toggle(&article("a1")).await;

    assert_eq!(store.storage().get(BOOKMARKS_KEY).await.unwrap(), None);
    assert!(store.storage().get("@other").await.unwrap().is_some());
}

#[test]
fn test_bookmarked_ids() {
    let ids = bookmarked_ids(&[article("a1"), article("a2")]);
    assert_eq!(ids.len(), 2);
    assert!(ids.contains("a1"));
    assert!(ids.contains("a2"));
    assert!(bookmarked_ids(&[]).is_empty());
}

#[test]
fn test_outcome_boolean_contract() {
    assert!(ToggleOutcome::NowBookmarked.is_bookmarked());
    assert!(!ToggleOutcome::NowUnbookmarked.is_bookmarked());
    assert!(!ToggleOutcome::Failed.is_bookmarked());
}
