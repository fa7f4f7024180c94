use super::{
    error::SourceError,
    source::MetadataSource,
    types::{VideoDescription, VideoVariant},
    utils::{determine_quality, format_duration},
};
use crate::config::UpstreamConfig;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::debug;

/// Unauthenticated tweet metadata endpoint. Rich media info (per-variant
/// bitrates, duration, thumbnail) but prone to being gated or reshaped
/// without notice, hence the mirror fallback.
pub struct SyndicationSource {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct TweetPayload {
    text: Option<String>,
    user: TweetUser,
    #[serde(default, rename = "mediaDetails")]
    media_details: Vec<MediaDetail>,
}

#[derive(Debug, Deserialize)]
struct TweetUser {
    name: String,
    screen_name: String,
}

#[derive(Debug, Deserialize)]
struct MediaDetail {
    #[serde(rename = "type")]
    kind: String,
    media_url_https: Option<String>,
    video_info: Option<VideoInfo>,
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    duration_millis: Option<u64>,
    #[serde(default)]
    variants: Vec<RawVariant>,
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    bitrate: Option<u64>,
    #[serde(default)]
    content_type: String,
    url: String,
}

impl SyndicationSource {
    pub fn new(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            base_url: config.syndication_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl MetadataSource for SyndicationSource {
    fn name(&self) -> &'static str {
        "syndication"
    }

    async fn resolve(&self, tweet_id: &str) -> Result<VideoDescription, SourceError> {
        let url = format!(
            "{}/tweet-result?id={}&lang=en&token=",
            self.base_url, tweet_id
        );
        debug!("Fetching tweet metadata from {}", url);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let payload: TweetPayload = response.json().await?;
        describe(payload)
    }
}

/// Normalize a syndication payload into the common description shape.
fn describe(payload: TweetPayload) -> Result<VideoDescription, SourceError> {
    if payload.media_details.is_empty() {
        return Err(SourceError::NoMedia);
    }

    let media = payload
        .media_details
        .iter()
        .find(|m| m.kind == "video" || m.kind == "animated_gif")
        .ok_or(SourceError::NoVideo)?;

    let video_info = media.video_info.as_ref().ok_or(SourceError::NoVideo)?;

    let mut qualities: Vec<VideoVariant> = video_info
        .variants
        .iter()
        .filter(|v| v.content_type == "video/mp4")
        .map(|v| VideoVariant {
            url: v.url.clone(),
            bitrate: v.bitrate.unwrap_or(0),
            quality: determine_quality(v.bitrate),
        })
        .collect();

    if qualities.is_empty() {
        return Err(SourceError::NoVideo);
    }

    qualities.sort_by(|a, b| b.bitrate.cmp(&a.bitrate));

    Ok(VideoDescription {
        title: payload
            .text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Twitter Video".to_string()),
        author: format!("@{}", payload.user.screen_name),
        author_name: payload.user.name,
        thumbnail: media.media_url_https.clone().unwrap_or_default(),
        duration: format_duration(video_info.duration_millis),
        qualities,
    })
}
