use tracing::{debug, error};

use crate::config::HeadlinesConfig;
use crate::error::{FetchError, Result};
use crate::models::{Article, HeadlinesResponse};

/// Stateless client for the headlines endpoint.
/// One GET per call; no retries, no caching, no pagination.
pub struct HeadlinesClient {
    http: reqwest::Client,
    config: HeadlinesConfig,
}

impl HeadlinesClient {
    pub fn new(config: HeadlinesConfig) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("newsreader/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FetchError::from)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &HeadlinesConfig {
        &self.config
    }

    /// Fetches top headlines for the configured default country.
    pub async fn top_headlines_default(&self) -> Result<Vec<Article>> {
        self.top_headlines(&self.config.default_country).await
    }

    /// Fetches top headlines for `country`.
    /// The code is passed through unvalidated; rejecting it is the endpoint's job.
    pub async fn top_headlines(&self, country: &str) -> Result<Vec<Article>> {
        self.request(country).await.map_err(|e| {
            error!("Error fetching news for country {}: {}", country, e);
            e.into()
        })
    }

    async fn request(&self, country: &str) -> std::result::Result<Vec<Article>, FetchError> {
        let url = format!("{}/news", self.config.base_url.trim_end_matches('/'));
        debug!("GET {} country={}", url, country);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("country", country),
                ("language", self.config.language.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let bytes = response.bytes().await?;
        let body: HeadlinesResponse = serde_json::from_slice(&bytes)?;
        let articles = body.into_articles();
        debug!("Fetched {} articles", articles.len());

        Ok(articles)
    }
}
