use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone)]
pub struct VideoDetails {
    pub title: String,
    pub description: String,
}

impl Default for VideoDetails {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    #[serde(default)]
    text_display: String,
}

/// Thin wrapper over the YouTube Data API v3.
pub struct YouTubeClient {
    client: Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, api_key }
    }

    /// Title and description for a video. An empty item list is not an
    /// error: the caller gets the "Untitled" defaults instead.
    pub async fn video_details(&self, video_id: &str) -> Result<VideoDetails> {
        let url = format!("{YOUTUBE_API_URL}/videos");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Video lookup failed with HTTP {}: {}", status, body);
            return Err(AppError::ExternalService(format!(
                "YouTube API error: HTTP {status}"
            )));
        }

        let list: VideoListResponse = response.json().await?;

        Ok(list
            .items
            .into_iter()
            .next()
            .map(|item| VideoDetails {
                title: item.snippet.title,
                description: item.snippet.description,
            })
            .unwrap_or_default())
    }

    /// Up to `max_comments` top-level comment bodies in plain text, in the
    /// order the API returns them.
    pub async fn top_level_comments(
        &self,
        video_id: &str,
        max_comments: usize,
    ) -> Result<Vec<String>> {
        let url = format!("{YOUTUBE_API_URL}/commentThreads");
        let max = max_comments.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("videoId", video_id),
                ("maxResults", max.as_str()),
                ("textFormat", "plainText"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Comment lookup failed with HTTP {}: {}", status, body);
            return Err(AppError::ExternalService(format!(
                "YouTube API error: HTTP {status}"
            )));
        }

        let list: CommentThreadListResponse = response.json().await?;

        Ok(list
            .items
            .into_iter()
            .map(|thread| thread.snippet.top_level_comment.snippet.text_display)
            .collect())
    }
}
