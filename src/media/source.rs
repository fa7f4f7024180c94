use super::{error::SourceError, types::VideoDescription};
use async_trait::async_trait;

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Human-readable name of the source
    fn name(&self) -> &'static str;

    /// Resolve the given tweet ID into a normalized video description
    async fn resolve(&self, tweet_id: &str) -> Result<VideoDescription, SourceError>;
}
