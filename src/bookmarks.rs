use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, error, warn};

use crate::error::StorageError;
use crate::models::Article;
use crate::storage::KeyValueStore;

/// Key the serialized bookmark list lives under.
pub const BOOKMARKS_KEY: &str = "@news_reader_bookmarks";

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    NowBookmarked,
    NowUnbookmarked,
    /// Persistence failed; the stored list is unchanged.
    Failed,
}

impl ToggleOutcome {
    /// Bookmark status as the boolean contract reports it. `Failed` reads as
    /// "not bookmarked".
    pub fn is_bookmarked(self) -> bool {
        matches!(self, ToggleOutcome::NowBookmarked)
    }
}

/// Owns the persisted, ordered list of bookmarked articles.
///
/// Every operation reads the whole list and, for toggles, writes the whole
/// list back. The read-modify-write is not guarded: callers must not issue
/// overlapping toggles.
pub struct BookmarkStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> BookmarkStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, BOOKMARKS_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns all bookmarks in stored order.
    /// An absent key, a failed read, or a value that is not a JSON array all
    /// yield an empty list. Records without a valid `article_id` are skipped.
    pub async fn get_all(&self) -> Vec<Article> {
        match self.storage.get(&self.key).await {
            Ok(raw) => self.decode(raw),
            Err(e) => {
                error!("Error getting bookmarks: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn is_bookmarked(&self, article_id: &str) -> bool {
        self.get_all()
            .await
            .iter()
            .any(|bookmark| bookmark.article_id == article_id)
    }

    /// Flips the bookmark status of `article`.
    ///
    /// Present: every entry with the same `article_id` is removed, order of
    /// the rest kept. Absent: the full record is appended.
    pub async fn toggle(&self, article: &Article) -> ToggleOutcome {
        let raw = match self.storage.get(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error toggling bookmark {}: {}", article.article_id, e);
                return ToggleOutcome::Failed;
            }
        };
        let bookmarks = self.decode(raw);

        let was_bookmarked = bookmarks
            .iter()
            .any(|bookmark| bookmark.article_id == article.article_id);

        let updated: Vec<Article> = if was_bookmarked {
            bookmarks
                .into_iter()
                .filter(|bookmark| bookmark.article_id != article.article_id)
                .collect()
        } else {
            let mut bookmarks = bookmarks;
            bookmarks.push(article.clone());
            bookmarks
        };

        if let Err(e) = self.write(&updated).await {
            error!("Error toggling bookmark {}: {}", article.article_id, e);
            return ToggleOutcome::Failed;
        }

        debug!(
            "Bookmark {} {}",
            article.article_id,
            if was_bookmarked { "removed" } else { "added" }
        );
        if was_bookmarked {
            ToggleOutcome::NowUnbookmarked
        } else {
            ToggleOutcome::NowBookmarked
        }
    }

    /// Boolean form of [`toggle`](Self::toggle): `true` means now bookmarked.
    /// A failure is reported as `false`, indistinguishable from a removal.
    pub async fn toggle_bookmark(&self, article: &Article) -> bool {
        self.toggle(article).await.is_bookmarked()
    }

    fn decode(&self, raw: Option<String>) -> Vec<Article> {
        let Some(raw) = raw else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => Article::from_records(records),
            Err(e) => {
                warn!("Stored bookmarks under {} are unreadable: {}", self.key, e);
                Vec::new()
            }
        }
    }

    async fn write(&self, bookmarks: &[Article]) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(bookmarks).map_err(|e| StorageError::WriteFailed {
            key: self.key.clone(),
            source: e.into(),
        })?;
        self.storage.set(&self.key, serialized).await
    }
}

/// Ids of every article in `bookmarks`, for fast membership checks.
/// Recompute after each focus or toggle; never persist it.
pub fn bookmarked_ids(bookmarks: &[Article]) -> HashSet<String> {
    bookmarks
        .iter()
        .map(|bookmark| bookmark.article_id.clone())
        .collect()
}

#[cfg(test)]
#[path = "bookmarks_tests.rs"]
mod tests;
