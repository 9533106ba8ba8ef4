pub mod resolver;
mod transcript;
mod youtube;

pub use transcript::{transcript_to_text, TranscriptClient, TranscriptEntry};
pub use youtube::{VideoDetails, YouTubeClient};
