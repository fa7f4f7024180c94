use serde::{Deserialize, Serialize};

/// Quality label attached to a single video rendition.
///
/// Labels derived from the syndication path come from the bitrate ladder in
/// [`super::utils::determine_quality`]; the mirror path only knows the
/// position of a rendition in the list and labels it HD/SD/Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
    Low,
    Unknown,
    #[serde(rename = "HD")]
    Hd,
    #[serde(rename = "SD")]
    Sd,
}

/// One downloadable rendition of a tweet's video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoVariant {
    pub url: String,
    /// Bits per second; 0 when the upstream did not report one.
    pub bitrate: u64,
    pub quality: Quality,
}

/// Normalized description of a tweet's video, independent of which
/// upstream produced it. `qualities` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescription {
    pub title: String,
    /// Handle prefixed with "@".
    pub author: String,
    #[serde(rename = "authorName")]
    pub author_name: String,
    /// Thumbnail URL, or empty string when the upstream has none.
    pub thumbnail: String,
    /// "M:SS" label; "0:00" when the duration is unknown.
    pub duration: String,
    pub qualities: Vec<VideoVariant>,
}
