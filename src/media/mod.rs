mod error;
mod fxtwitter;
mod proxy;
mod source;
mod syndication;
mod types;
pub mod utils;

pub use error::{NoVideoError, SourceError, UpstreamFetchError};
pub use proxy::{StreamProxy, VideoStream};
pub use source::MetadataSource;
pub use types::{Quality, VideoDescription, VideoVariant};

use crate::config::UpstreamConfig;
use fxtwitter::FxTwitterSource;
use syndication::SyndicationSource;
use tracing::{info, warn};

pub struct VideoResolver {
    sources: Vec<Box<dyn MetadataSource>>,
}

impl VideoResolver {
    pub fn new(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        info!("Video resolver initialized - using syndication with fxtwitter fallback");

        // Source instances in priority order (syndication first, then the
        // fxtwitter mirror). The mirror only runs after a syndication
        // failure has been observed, never speculatively.
        let sources: Vec<Box<dyn MetadataSource>> = vec![
            Box::new(SyndicationSource::new(client.clone(), config)),
            Box::new(FxTwitterSource::new(client, config)),
        ];

        Self { sources }
    }

    #[cfg(test)]
    fn with_sources(sources: Vec<Box<dyn MetadataSource>>) -> Self {
        Self { sources }
    }

    pub async fn resolve(&self, tweet_id: &str) -> Result<VideoDescription, NoVideoError> {
        info!("Resolving video metadata for tweet {}", tweet_id);

        let mut errors = Vec::new();

        for source in &self.sources {
            match source.resolve(tweet_id).await {
                Ok(description) => {
                    info!("Successfully resolved with {}", source.name());
                    return Ok(description);
                }
                Err(e) => {
                    warn!("{} failed: {}", source.name(), e);
                    errors.push(format!("{}: {e}", source.name()));
                }
            }
        }

        Err(NoVideoError {
            details: errors.join(". "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubSource {
        name: &'static str,
        succeed: bool,
        calls: Arc<AtomicUsize>,
    }

    fn stub_description() -> VideoDescription {
        VideoDescription {
            title: "stub".to_string(),
            author: "@stub".to_string(),
            author_name: "Stub".to_string(),
            thumbnail: String::new(),
            duration: "0:00".to_string(),
            qualities: vec![VideoVariant {
                url: "https://v.example/stub.mp4".to_string(),
                bitrate: 1_000_000,
                quality: Quality::Hd,
            }],
        }
    }

    #[async_trait]
    impl MetadataSource for StubSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn resolve(&self, _tweet_id: &str) -> Result<VideoDescription, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(stub_description())
            } else {
                Err(SourceError::NoMedia)
            }
        }
    }

    fn stub(name: &'static str, succeed: bool) -> (Box<dyn MetadataSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = StubSource {
            name,
            succeed,
            calls: calls.clone(),
        };
        (Box::new(source), calls)
    }

    #[test]
    fn test_video_resolver_new() {
        let resolver = VideoResolver::new(reqwest::Client::new(), &UpstreamConfig::default());
        assert_eq!(resolver.sources.len(), 2);
        assert_eq!(resolver.sources[0].name(), "syndication");
        assert_eq!(resolver.sources[1].name(), "fxtwitter");
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let (primary, primary_calls) = stub("primary", true);
        let (fallback, fallback_calls) = stub("fallback", true);
        let resolver = VideoResolver::with_sources(vec![primary, fallback]);

        let description = resolver.resolve("1").await.unwrap();
        assert_eq!(description.title, "stub");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_invokes_fallback_once() {
        let (primary, primary_calls) = stub("primary", false);
        let (fallback, fallback_calls) = stub("fallback", true);
        let resolver = VideoResolver::with_sources(vec![primary, fallback]);

        let description = resolver.resolve("1").await.unwrap();
        assert_eq!(description.title, "stub");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_sources_exhausted() {
        let (primary, primary_calls) = stub("primary", false);
        let (fallback, fallback_calls) = stub("fallback", false);
        let resolver = VideoResolver::with_sources(vec![primary, fallback]);

        let err = resolver.resolve("1").await.unwrap_err();
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
        assert!(err.to_string().contains("primary"));
        assert!(err.to_string().contains("fallback"));
        assert!(err
            .to_string()
            .starts_with("unable to fetch video from all sources"));
    }
}
