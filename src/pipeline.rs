use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;

use crate::ai::Generator;
use crate::db::BlogStore;
use crate::error::Result;
use crate::models::Blog;
use crate::video::{resolver, transcript_to_text, TranscriptClient, YouTubeClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Resolving,
    Fetching,
    Generating,
    Persisting,
}

impl PipelineStage {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Resolving => "Resolving URL",
            PipelineStage::Fetching => "Fetching video data",
            PipelineStage::Generating => "Generating article",
            PipelineStage::Persisting => "Saving blog",
        }
    }
}

/// Progress messages posted to the caller while a run is in flight. The
/// error side of `Finished` is already stringified because it crosses a
/// task boundary.
pub enum PipelineUpdate {
    Stage(PipelineStage),
    Finished(std::result::Result<Blog, String>),
}

/// Sequences resolver, fetchers, generator and store for one blog
/// creation. Stages run strictly in order; the store is touched exactly
/// once, at the end, with fully assembled data, so a failure anywhere
/// earlier leaves nothing to clean up.
pub struct Pipeline {
    youtube: YouTubeClient,
    transcripts: TranscriptClient,
    generator: Generator,
    store: Arc<BlogStore>,
    transcript_char_limit: usize,
    max_comments: usize,
}

impl Pipeline {
    pub fn new(
        youtube: YouTubeClient,
        generator: Generator,
        store: Arc<BlogStore>,
        transcript_char_limit: usize,
        max_comments: usize,
    ) -> Result<Self> {
        Ok(Self {
            youtube,
            transcripts: TranscriptClient::new()?,
            generator,
            store,
            transcript_char_limit,
            max_comments,
        })
    }

    pub async fn create_blog_from_url(
        &self,
        url: &str,
        progress: &mpsc::Sender<PipelineUpdate>,
    ) -> Result<Blog> {
        let _ = progress.send(PipelineUpdate::Stage(PipelineStage::Resolving)).await;
        let video_id = resolver::resolve(url)?;

        // Metadata, transcript and comments are independent but fetched
        // sequentially; a single user action triggers at most one run.
        let _ = progress.send(PipelineUpdate::Stage(PipelineStage::Fetching)).await;
        let details = self.youtube.video_details(&video_id).await?;
        let entries = self.transcripts.transcript(&video_id).await?;
        let transcript_text = transcript_to_text(&entries, self.transcript_char_limit);
        let comments = self
            .youtube
            .top_level_comments(&video_id, self.max_comments)
            .await?;

        // Two independent completion calls; the tag call only sees the
        // generated article.
        let _ = progress.send(PipelineUpdate::Stage(PipelineStage::Generating)).await;
        let article = self
            .generator
            .generate_article(&transcript_text, &details.title, &details.description, &comments)
            .await?;
        let tags = self.generator.generate_tags(&article).await?;

        let _ = progress.send(PipelineUpdate::Stage(PipelineStage::Persisting)).await;
        let blog_id = self
            .store
            .save_blog(details.title, article, tags)
            .await?;

        let blog = self
            .store
            .get_blog(blog_id)
            .await?
            .ok_or_else(|| anyhow!("Blog {blog_id} missing right after save"))?;

        Ok(blog)
    }
}
