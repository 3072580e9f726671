//! Screen-independent state of the headlines feed.
//!
//! Holds the last fetched articles and the set of bookmarked ids derived from
//! the bookmark store. The id set is a projection: it is rebuilt from the
//! store on every load, refresh and focus, and patched from the outcome of a
//! toggle.

use std::collections::HashSet;
use tracing::{error, info};

use crate::bookmarks::{bookmarked_ids, BookmarkStore, ToggleOutcome};
use crate::headlines::HeadlinesClient;
use crate::models::Article;
use crate::storage::KeyValueStore;

#[derive(Debug, Default)]
pub struct FeedState {
    articles: Vec<Article>,
    bookmarked: HashSet<String>,
}

impl FeedState {
    /// Initial load: fetch headlines and bookmarks together.
    pub async fn load<S: KeyValueStore>(
        client: &HeadlinesClient,
        store: &BookmarkStore<S>,
        country: &str,
    ) -> Self {
        let mut state = Self::default();
        state.refresh(client, store, country).await;
        state
    }

    /// Re-fetches headlines and re-derives bookmarked ids.
    /// A failed fetch leaves an empty feed.
    pub async fn refresh<S: KeyValueStore>(
        &mut self,
        client: &HeadlinesClient,
        store: &BookmarkStore<S>,
        country: &str,
    ) {
        let (fetched, bookmarks) =
            futures::join!(client.top_headlines(country), store.get_all());

        self.articles = match fetched {
            Ok(articles) => articles,
            Err(e) => {
                error!("Error fetching news: {}", e);
                Vec::new()
            }
        };
        self.bookmarked = bookmarked_ids(&bookmarks);
        info!(
            "Feed has {} articles, {} bookmarked",
            self.articles.len(),
            self.bookmarked.len()
        );
    }

    /// Re-derives bookmarked ids without touching the fetched articles.
    pub async fn on_focus<S: KeyValueStore>(&mut self, store: &BookmarkStore<S>) {
        self.bookmarked = bookmarked_ids(&store.get_all().await);
    }

    /// Toggles `article` in the store and patches the id set from the outcome.
    pub async fn toggle<S: KeyValueStore>(
        &mut self,
        store: &BookmarkStore<S>,
        article: &Article,
    ) -> ToggleOutcome {
        let outcome = store.toggle(article).await;
        if outcome.is_bookmarked() {
            self.bookmarked.insert(article.article_id.clone());
        } else {
            self.bookmarked.remove(&article.article_id);
        }
        outcome
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn find(&self, article_id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.article_id == article_id)
    }

    pub fn bookmarked(&self) -> &HashSet<String> {
        &self.bookmarked
    }

    pub fn is_bookmarked(&self, article_id: &str) -> bool {
        self.bookmarked.contains(article_id)
    }
}

/// Finds `article_id` in a fresh fetch, falling back to the bookmark list.
///
/// Without a client (no credential configured) only bookmarks are searched,
/// so a bookmarked article can still be shown or unbookmarked offline.
/// Returns the article and whether it is currently bookmarked.
pub async fn find_article<S: KeyValueStore>(
    client: Option<&HeadlinesClient>,
    store: &BookmarkStore<S>,
    article_id: &str,
) -> Option<(Article, bool)> {
    if let Some(client) = client {
        let feed = FeedState::load(client, store, &client.config().default_country).await;
        if let Some(article) = feed.find(article_id) {
            return Some((article.clone(), feed.is_bookmarked(article_id)));
        }
        info!("Article {} not in current headlines, checking bookmarks", article_id);
    }

    store
        .get_all()
        .await
        .into_iter()
        .find(|a| a.article_id == article_id)
        .map(|article| (article, true))
}
