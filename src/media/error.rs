use thiserror::Error;

/// Failure of a single metadata source attempt. Any of these sends the
/// resolver on to the next source in the chain.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected upstream status {0}")]
    Status(reqwest::StatusCode),
    #[error("no media found in tweet")]
    NoMedia,
    #[error("no video found in tweet")]
    NoVideo,
}

/// Every metadata source was tried and none produced a usable video.
#[derive(Debug, Error)]
#[error("unable to fetch video from all sources: {details}")]
pub struct NoVideoError {
    pub details: String,
}

/// The direct media fetch behind `/download` failed.
#[derive(Debug, Error)]
pub enum UpstreamFetchError {
    #[error("failed to fetch video: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream responded with HTTP {0}")]
    Status(reqwest::StatusCode),
}
