use reqwest::StatusCode;

/// Why a headlines request failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of the key-value persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read key {key}")]
    ReadFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write key {key}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to fetch headlines")]
    FetchFailed(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, Error>;
