use super::types::Quality;
use once_cell::sync::Lazy;
use regex::Regex;

/// Both hosting domains serve the same `/{user}/status/{id}` path shape, so
/// pattern order does not matter; the first match wins.
static TWEET_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)twitter\.com/\w+/status/(\d+)").unwrap(),
        Regex::new(r"(?i)x\.com/\w+/status/(\d+)").unwrap(),
    ]
});

/// Extract the numeric tweet ID from a post URL, or `None` when the URL
/// does not reference a tweet.
pub fn extract_tweet_id(url: &str) -> Option<String> {
    for pattern in TWEET_URL_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(url) {
            return Some(captures[1].to_string());
        }
    }
    None
}

/// Map a reported bitrate onto a quality label. Thresholds are inclusive
/// lower bounds; an absent or zero bitrate means the upstream did not
/// report one and maps to `Unknown`.
pub fn determine_quality(bitrate: Option<u64>) -> Quality {
    let bitrate = match bitrate {
        Some(b) if b > 0 => b,
        _ => return Quality::Unknown,
    };

    if bitrate >= 2_000_000 {
        Quality::P1080
    } else if bitrate >= 1_000_000 {
        Quality::P720
    } else if bitrate >= 500_000 {
        Quality::P480
    } else if bitrate >= 250_000 {
        Quality::P360
    } else {
        Quality::Low
    }
}

/// Format a millisecond duration as "M:SS". Unknown or zero duration
/// yields "0:00".
pub fn format_duration(millis: Option<u64>) -> String {
    let millis = millis.unwrap_or(0);
    let seconds = millis / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
