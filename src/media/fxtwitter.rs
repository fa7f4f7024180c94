use super::{
    error::SourceError,
    source::MetadataSource,
    types::{Quality, VideoDescription, VideoVariant},
};
use crate::config::UpstreamConfig;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::debug;

/// Third-party mirror API. Exposes direct video URLs but no bitrates and no
/// duration, so both are synthesized: bitrate `(n - i) * 1_000_000` keeps
/// the list descending by construction, and the HD/SD/Low labels are
/// positional only. The labels say nothing about encoded resolution.
pub struct FxTwitterSource {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    tweet: Option<MirrorTweet>,
}

#[derive(Debug, Deserialize)]
struct MirrorTweet {
    text: Option<String>,
    author: MirrorAuthor,
    media: Option<MirrorMedia>,
}

#[derive(Debug, Deserialize)]
struct MirrorAuthor {
    name: String,
    screen_name: String,
}

#[derive(Debug, Deserialize)]
struct MirrorMedia {
    #[serde(default)]
    videos: Vec<MirrorVideo>,
    #[serde(default)]
    photos: Vec<MirrorPhoto>,
}

#[derive(Debug, Deserialize)]
struct MirrorVideo {
    url: String,
}

#[derive(Debug, Deserialize)]
struct MirrorPhoto {
    url: String,
}

impl FxTwitterSource {
    pub fn new(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            base_url: config.fallback_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl MetadataSource for FxTwitterSource {
    fn name(&self) -> &'static str {
        "fxtwitter"
    }

    async fn resolve(&self, tweet_id: &str) -> Result<VideoDescription, SourceError> {
        let url = format!("{}/status/{}", self.base_url, tweet_id);
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

        let payload: StatusPayload = response.json().await?;
        describe(payload)
    }
}

/// Normalize a mirror payload into the common description shape.
fn describe(payload: StatusPayload) -> Result<VideoDescription, SourceError> {
    let tweet = payload.tweet.ok_or(SourceError::NoVideo)?;
    let media = tweet.media.ok_or(SourceError::NoVideo)?;

    if media.videos.is_empty() {
        return Err(SourceError::NoVideo);
    }

    let count = media.videos.len() as u64;
    let qualities: Vec<VideoVariant> = media
        .videos
        .iter()
        .enumerate()
        .map(|(index, video)| VideoVariant {
            url: video.url.clone(),
            bitrate: (count - index as u64) * 1_000_000,
            quality: match index {
                0 => Quality::Hd,
                1 => Quality::Sd,
                _ => Quality::Low,
            },
        })
        .collect();

    Ok(VideoDescription {
        title: tweet
            .text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Twitter Video".to_string()),
        author: format!("@{}", tweet.author.screen_name),
        author_name: tweet.author.name,
        thumbnail: media
            .photos
            .first()
            .map(|p| p.url.clone())
            .unwrap_or_default(),
        // The mirror does not expose a duration.
        duration: "0:00".to_string(),
        qualities,
    })
}
