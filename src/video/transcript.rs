use anyhow::anyhow;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::error::{AppError, Result};

/// One timestamped fragment of a video's transcript.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub text: String,
    #[allow(dead_code)]
    pub start: f64,
    #[allow(dead_code)]
    pub duration: f64,
}

pub struct TranscriptClient {
    api: YouTubeTranscriptApi,
}

impl TranscriptClient {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| anyhow!("Failed to initialize transcript client: {e}"))?;
        Ok(Self { api })
    }

    /// Fetch the transcript for a video. Provider failures (captions
    /// disabled, private/deleted video) surface unchanged; nothing is
    /// retried.
    pub async fn transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>> {
        let fetched = self
            .api
            .fetch_transcript(video_id, &["en"], false)
            .await
            .map_err(|e| AppError::TranscriptUnavailable(e.to_string()))?;

        Ok(fetched
            .snippets
            .into_iter()
            .map(|snippet| TranscriptEntry {
                text: snippet.text,
                start: snippet.start,
                duration: snippet.duration,
            })
            .collect())
    }
}

/// Join transcript fragments with newlines and hard-cut the result at
/// `limit_chars` characters. The cut can land mid-word; that is the point,
/// it caps the token budget of the generation request.
pub fn transcript_to_text(entries: &[TranscriptEntry], limit_chars: usize) -> String {
    let text = entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    text.chars().take(limit_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> TranscriptEntry {
        TranscriptEntry {
            text: text.to_string(),
            start: 0.0,
            duration: 1.0,
        }
    }

    #[test]
    fn joins_entries_with_newlines() {
        let entries = vec![entry("a"), entry("b")];
        assert_eq!(transcript_to_text(&entries, 1000), "a\nb");
    }

    #[test]
    fn truncation_counts_the_joining_newline() {
        let entries = vec![entry("a"), entry("b")];
        assert_eq!(transcript_to_text(&entries, 2), "a\n");
        assert_eq!(transcript_to_text(&entries, 3), "a\nb");
    }

    #[test]
    fn truncation_may_split_mid_word() {
        let entries = vec![entry("hello world")];
        assert_eq!(transcript_to_text(&entries, 8), "hello wo");
    }

    #[test]
    fn truncation_is_character_based_not_byte_based() {
        let entries = vec![entry("héllo")];
        assert_eq!(transcript_to_text(&entries, 2), "hé");
    }

    #[test]
    fn empty_transcript_yields_empty_text() {
        assert_eq!(transcript_to_text(&[], 1000), "");
    }
}
