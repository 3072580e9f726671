use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Format the headlines endpoint uses for `pubDate`.
const PUB_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Keys with a dedicated field; `extra` never holds them.
const MODELLED_KEYS: [&str; 8] = [
    "article_id",
    "title",
    "description",
    "content",
    "image_url",
    "source_id",
    "pubDate",
    "link",
];

/// A single news item as returned by the headlines endpoint.
///
/// Only `article_id` is required. Fields this crate does not model are kept in
/// `extra` so that a bookmarked copy is the complete record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, rename = "pubDate", skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Article {
    pub fn new(article_id: impl Into<String>) -> Self {
        Self {
            article_id: article_id.into(),
            title: None,
            description: None,
            content: None,
            image_url: None,
            source_id: None,
            pub_date: None,
            link: None,
            extra: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Validates untyped records, dropping any without a string `article_id`.
    pub fn from_records(records: Vec<Value>) -> Vec<Article> {
        records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Article>(record) {
                Ok(article) => Some(article),
                Err(e) => {
                    warn!("Dropping article record without a valid article_id: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Fields the endpoint sent that have no dedicated field here.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Sets an unmodelled field. Returns `false`, leaving the record unchanged,
    /// for keys that have a dedicated field.
    pub fn insert_extra(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if MODELLED_KEYS.contains(&key.as_str()) {
            return false;
        }
        self.extra.insert(key, value);
        true
    }

    /// Parses `pubDate` into a UTC timestamp.
    /// Accepts the endpoint's `YYYY-MM-DD HH:MM:SS` form and RFC 3339.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        let raw = self.pub_date.as_deref()?.trim();
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, PUB_DATE_FORMAT) {
            return Some(naive.and_utc());
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

/// Body of a headlines response. Records are kept untyped until validated.
#[derive(Debug, Default, Deserialize)]
pub struct HeadlinesResponse {
    #[serde(default)]
    pub results: Option<Vec<Value>>,
}

impl HeadlinesResponse {
    /// Converts `results` into articles, dropping records without a string
    /// `article_id`. A missing or null `results` yields no articles.
    pub fn into_articles(self) -> Vec<Article> {
        Article::from_records(self.results.unwrap_or_default())
    }
}
