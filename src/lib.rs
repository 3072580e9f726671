//! Headlines fetching and local bookmarking for a news reader.
//!
//! [`headlines::HeadlinesClient`] pulls top headlines from the remote endpoint,
//! [`bookmarks::BookmarkStore`] keeps the user's bookmarks in a
//! [`storage::KeyValueStore`], and [`feed::FeedState`] ties the two together
//! the way a feed screen consumes them.

pub mod bookmarks;
pub mod config;
pub mod error;
pub mod feed;
pub mod headlines;
pub mod models;
pub mod render;
pub mod storage;

pub use bookmarks::{bookmarked_ids, BookmarkStore, ToggleOutcome, BOOKMARKS_KEY};
pub use error::{Error, FetchError, Result, StorageError};
pub use headlines::HeadlinesClient;
pub use models::Article;
