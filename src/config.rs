use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Settings for the headlines endpoint.
#[derive(Debug, Clone)]
pub struct HeadlinesConfig {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub default_country: String,
    /// No timeout unless set; a request otherwise runs until it completes or fails.
    pub timeout: Option<Duration>,
}

impl HeadlinesConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Resolves the directory bookmark data is kept in.
///
/// An explicit path wins (with `~` expanded), then `NEWSREADER_DATA_DIR`,
/// then `$XDG_DATA_HOME/newsreader`, then `~/.local/share/newsreader`.
pub fn resolve_data_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(shellexpand::tilde(path).to_string());
    }
    if let Ok(dir) = std::env::var("NEWSREADER_DATA_DIR") {
        return PathBuf::from(shellexpand::tilde(&dir).to_string());
    }
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data).join("newsreader");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".local/share/newsreader")
}
