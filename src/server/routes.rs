use super::{error::ApiError, AppState};
use crate::media::{utils::extract_tweet_id, VideoDescription};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{ACCEPT_RANGES, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoResponse {
    pub success: bool,
    pub data: VideoDescription,
}

pub async fn video(
    State(state): State<AppState>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<VideoResponse>, ApiError> {
    let url = request
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    let tweet_id =
        extract_tweet_id(&url).ok_or_else(|| ApiError::bad_request("Invalid Twitter URL"))?;

    match state.resolver.resolve(&tweet_id).await {
        Ok(data) => Ok(Json(VideoResponse {
            success: true,
            data,
        })),
        Err(e) => {
            error!("Resolution failed for tweet {}: {}", tweet_id, e);
            Err(ApiError::resolution(e.to_string()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    url: Option<String>,
    preview: Option<String>,
}

pub async fn download(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let url = params
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL parameter is required"))?;

    // Reject junk before issuing any outbound request.
    let parsed = Url::parse(&url).map_err(|_| ApiError::bad_request("Invalid URL parameter"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ApiError::bad_request("Invalid URL parameter"));
    }

    let stream = state.proxy.fetch(&url).await.map_err(|e| {
        error!("Download failed for {}: {}", url, e);
        ApiError::upstream("Failed to download video")
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
    headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    if let Some(length) = stream.content_length() {
        if let Ok(value) = HeaderValue::from_str(&length.to_string()) {
            headers.insert(CONTENT_LENGTH, value);
        }
    }

    if params.preview.as_deref() != Some("true") {
        let filename = format!("twitter-video-{}.mp4", Utc::now().timestamp_millis());
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        {
            headers.insert(CONTENT_DISPOSITION, value);
        }
    }

    Ok((headers, Body::from_stream(stream.into_byte_stream())).into_response())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
