use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub youtube_api_key: Option<String>,
    pub openai_api_key: Option<String>,

    #[serde(default = "default_article_model")]
    pub article_model: String,

    #[serde(default = "default_tag_model")]
    pub tag_model: String,

    #[serde(default = "default_transcript_char_limit")]
    pub transcript_char_limit: usize,

    #[serde(default = "default_max_comments")]
    pub max_comments: usize,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blogstream");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("blogstream.db").to_string_lossy().to_string()
}

fn default_article_model() -> String {
    "gpt-4o".to_string()
}

fn default_tag_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_transcript_char_limit() -> usize {
    1000
}

fn default_max_comments() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            youtube_api_key: None,
            openai_api_key: None,
            article_model: default_article_model(),
            tag_model: default_tag_model(),
            transcript_char_limit: default_transcript_char_limit(),
            max_comments: default_max_comments(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blogstream")
            .join("config.toml")
    }
}
