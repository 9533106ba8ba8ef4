use std::sync::Arc;

use tokio::sync::mpsc;

use crate::ai::Generator;
use crate::config::Config;
use crate::db::BlogStore;
use crate::error::Result;
use crate::models::{Blog, BlogSummary};
use crate::pipeline::{Pipeline, PipelineStage, PipelineUpdate};
use crate::tui::AppAction;
use crate::video::YouTubeClient;

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    Idle,
    Running(PipelineStage),
    Done,
    Failed(String),
    NoApiKeys,
}

pub struct App {
    // Data
    pub blogs: Vec<BlogSummary>,
    pub search_results: Option<Vec<BlogSummary>>,
    pub search_query: String,
    pub open_blog: Option<Blog>,

    // UI State
    pub selected_index: usize,
    pub show_help: bool,
    pub url_input_active: bool,
    pub url_input: String,
    pub search_input_active: bool,
    pub search_input: String,
    spinner_frame: usize,

    // Async state
    pub pipeline_status: PipelineStatus,
    pipeline_rx: mpsc::Receiver<PipelineUpdate>,
    pipeline_tx: mpsc::Sender<PipelineUpdate>,

    // Services
    pub store: Arc<BlogStore>,
    pipeline: Option<Arc<Pipeline>>,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let store = Arc::new(BlogStore::open(&config.db_path).await?);

        // Creating blogs needs both external keys; browsing the store
        // does not.
        let pipeline = match (&config.youtube_api_key, &config.openai_api_key) {
            (Some(youtube_key), Some(openai_key)) => {
                let youtube = YouTubeClient::new(youtube_key.clone());
                let generator = Generator::new(
                    openai_key.clone(),
                    config.article_model.clone(),
                    config.tag_model.clone(),
                );
                Some(Arc::new(Pipeline::new(
                    youtube,
                    generator,
                    Arc::clone(&store),
                    config.transcript_char_limit,
                    config.max_comments,
                )?))
            }
            _ => None,
        };

        let blogs = store.list_blogs().await?;

        let (pipeline_tx, pipeline_rx) = mpsc::channel(8);

        Ok(Self {
            blogs,
            search_results: None,
            search_query: String::new(),
            open_blog: None,
            selected_index: 0,
            show_help: false,
            url_input_active: false,
            url_input: String::new(),
            search_input_active: false,
            search_input: String::new(),
            spinner_frame: 0,
            pipeline_status: PipelineStatus::Idle,
            pipeline_rx,
            pipeline_tx,
            store,
            pipeline,
        })
    }

    /// The list currently on screen: search results when a search is
    /// active, otherwise every blog.
    pub fn visible_blogs(&self) -> &[BlogSummary] {
        self.search_results.as_deref().unwrap_or(&self.blogs)
    }

    pub fn selected_blog(&self) -> Option<&BlogSummary> {
        self.visible_blogs().get(self.selected_index)
    }

    pub fn has_api_keys(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.visible_blogs().len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::OpenBlog => {
                self.open_selected_blog().await?;
            }

            AppAction::CloseBlog => {
                self.open_blog = None;
            }

            AppAction::DeleteBlog => {
                if let Some(blog) = self.selected_blog() {
                    let id = blog.id;
                    self.store.delete_blog(id).await?;
                    if self.open_blog.as_ref().map(|b| b.id) == Some(id) {
                        self.open_blog = None;
                    }
                    self.reload_blogs().await?;
                    let len = self.visible_blogs().len();
                    if len > 0 && self.selected_index >= len {
                        self.selected_index = len - 1;
                    }
                }
            }

            AppAction::NewBlogStart => {
                if self.has_api_keys() {
                    self.url_input_active = true;
                    self.url_input.clear();
                } else {
                    self.pipeline_status = PipelineStatus::NoApiKeys;
                }
            }

            AppAction::SearchStart => {
                self.search_input_active = true;
                self.search_input.clear();
            }

            AppAction::ClearSearch => {
                if self.search_results.is_some() {
                    self.search_results = None;
                    self.search_query.clear();
                    self.selected_index = 0;
                }
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }

            AppAction::UrlInputChar(c) => {
                self.url_input.push(c);
            }

            AppAction::UrlInputBackspace => {
                self.url_input.pop();
            }

            AppAction::UrlInputConfirm => {
                let url = self.url_input.trim().to_string();
                self.url_input_active = false;
                self.url_input.clear();
                if !url.is_empty() {
                    self.start_pipeline(url);
                }
            }

            AppAction::UrlInputCancel => {
                self.url_input_active = false;
                self.url_input.clear();
            }

            AppAction::SearchInputChar(c) => {
                self.search_input.push(c);
            }

            AppAction::SearchInputBackspace => {
                self.search_input.pop();
            }

            AppAction::SearchInputConfirm => {
                let query = self.search_input.trim().to_string();
                self.search_input_active = false;
                self.search_input.clear();
                if !query.is_empty() {
                    self.run_search(query).await?;
                }
            }

            AppAction::SearchInputCancel => {
                self.search_input_active = false;
                self.search_input.clear();
            }
        }

        Ok(false)
    }

    async fn open_selected_blog(&mut self) -> Result<()> {
        let Some(summary) = self.selected_blog() else {
            return Ok(());
        };
        let id = summary.id;

        if let Some(blog) = self.store.get_blog(id).await? {
            self.store.mark_read(id).await?;
            self.open_blog = Some(Blog { read: true, ..blog });
            // Keep the list in sync without a reload
            for list in [Some(&mut self.blogs), self.search_results.as_mut()]
                .into_iter()
                .flatten()
            {
                if let Some(entry) = list.iter_mut().find(|b| b.id == id) {
                    entry.read = true;
                }
            }
        }

        Ok(())
    }

    /// Kick off one blog creation in the background. A second request
    /// while a run is in flight is ignored.
    fn start_pipeline(&mut self, url: String) {
        let Some(pipeline) = &self.pipeline else {
            self.pipeline_status = PipelineStatus::NoApiKeys;
            return;
        };

        if matches!(self.pipeline_status, PipelineStatus::Running(_)) {
            return;
        }

        self.pipeline_status = PipelineStatus::Running(PipelineStage::Resolving);

        let pipeline = Arc::clone(pipeline);
        let tx = self.pipeline_tx.clone();

        tokio::spawn(async move {
            let result = pipeline
                .create_blog_from_url(&url, &tx)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(PipelineUpdate::Finished(result)).await;
        });
    }

    /// Drain pipeline progress messages (non-blocking).
    pub async fn poll_pipeline_update(&mut self) -> Result<()> {
        while let Ok(update) = self.pipeline_rx.try_recv() {
            match update {
                PipelineUpdate::Stage(stage) => {
                    self.pipeline_status = PipelineStatus::Running(stage);
                }
                PipelineUpdate::Finished(Ok(blog)) => {
                    self.reload_blogs().await?;
                    self.search_results = None;
                    self.search_query.clear();
                    self.selected_index = 0;
                    self.open_blog = Some(blog);
                    self.pipeline_status = PipelineStatus::Done;
                }
                PipelineUpdate::Finished(Err(e)) => {
                    tracing::error!("Blog creation failed: {}", e);
                    self.pipeline_status = PipelineStatus::Failed(e);
                }
            }
        }
        Ok(())
    }

    async fn run_search(&mut self, query: String) -> Result<()> {
        let names: Vec<String> = query.split(',').map(|s| s.trim().to_string()).collect();
        let results = self.store.search_by_tags(names).await?;
        self.search_results = Some(results);
        self.search_query = query;
        self.selected_index = 0;
        self.open_blog = None;
        Ok(())
    }

    async fn reload_blogs(&mut self) -> Result<()> {
        self.blogs = self.store.list_blogs().await?;
        if let Some(results) = &mut self.search_results {
            let query = self.search_query.clone();
            let names: Vec<String> = query.split(',').map(|s| s.trim().to_string()).collect();
            *results = self.store.search_by_tags(names).await?;
        }
        Ok(())
    }
}
