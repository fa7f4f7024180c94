use super::error::UpstreamFetchError;
use crate::config::UpstreamConfig;
use bytes::Bytes;
use futures_util::Stream;
use reqwest::header::{REFERER, USER_AGENT};
use tracing::debug;

/// Fetches a direct media URL and hands the response back as a byte stream.
///
/// The CDN refuses requests that do not look like they come from a browser
/// on the origin platform, so every fetch carries a browser User-Agent and
/// a twitter.com Referer.
#[derive(Clone)]
pub struct StreamProxy {
    client: reqwest::Client,
    user_agent: String,
    referer: String,
}

/// An upstream response ready to be relayed. Dropping it releases the
/// upstream connection; nothing is buffered beyond the transport's own
/// chunking.
#[derive(Debug)]
pub struct VideoStream {
    response: reqwest::Response,
}

impl VideoStream {
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    pub fn into_byte_stream(self) -> impl Stream<Item = Result<Bytes, reqwest::Error>> {
        self.response.bytes_stream()
    }
}

impl StreamProxy {
    pub fn new(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            user_agent: config.user_agent.clone(),
            referer: config.referer.clone(),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<VideoStream, UpstreamFetchError> {
        debug!("Proxying media fetch for {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .header(REFERER, &self.referer)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamFetchError::Status(response.status()));
        }

        Ok(VideoStream { response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use axum::{
        extract::State,
        http::HeaderMap,
        routing::get,
        Router,
    };
    use futures_util::StreamExt;
    use std::sync::{Arc, Mutex};

    fn proxy() -> StreamProxy {
        StreamProxy::new(reqwest::Client::new(), &UpstreamConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_relays_bytes_and_length() {
        let router = Router::new().route("/video.mp4", get(|| async { "fake mp4 payload" }));
        let base_url = testing::spawn_server(router).await;

        let stream = proxy()
            .fetch(&format!("{}/video.mp4", base_url))
            .await
            .unwrap();

        assert_eq!(stream.content_length(), Some(16));

        let mut body = Vec::new();
        let mut chunks = Box::pin(stream.into_byte_stream());
        while let Some(chunk) = chunks.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"fake mp4 payload");
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let seen: Arc<Mutex<Option<(Option<String>, Option<String>)>>> =
            Arc::new(Mutex::new(None));
        let router = Router::new()
            .route(
                "/video.mp4",
                get(
                    |State(seen): State<Arc<Mutex<Option<(Option<String>, Option<String>)>>>>,
                     headers: HeaderMap| async move {
                        let get = |name: &str| {
                            headers
                                .get(name)
                                .and_then(|v| v.to_str().ok())
                                .map(String::from)
                        };
                        *seen.lock().unwrap() = Some((get("user-agent"), get("referer")));
                        "ok"
                    },
                ),
            )
            .with_state(seen.clone());
        let base_url = testing::spawn_server(router).await;

        proxy()
            .fetch(&format!("{}/video.mp4", base_url))
            .await
            .unwrap();

        let (user_agent, referer) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            user_agent.as_deref(),
            Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        );
        assert_eq!(referer.as_deref(), Some("https://twitter.com/"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let base_url = testing::spawn_server(Router::new()).await;

        let err = proxy()
            .fetch(&format!("{}/missing.mp4", base_url))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamFetchError::Status(status) if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_upstream() {
        let err = proxy()
            .fetch("http://127.0.0.1:1/video.mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamFetchError::Request(_)));
    }
}
