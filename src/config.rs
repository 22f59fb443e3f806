use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// CSV file with the `Title`, `Description` and `Genres` columns
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// JSON file mapping each title to its precomputed embedding
    #[serde(default = "default_embeddings_path")]
    pub embeddings_path: PathBuf,

    /// OpenAI API key; generated shows are skipped when absent
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    #[serde(default = "default_chat_model")]
    pub openai_chat_model: String,

    #[serde(default = "default_image_model")]
    pub openai_image_model: String,

    /// Image shown in place of a poster that could not be fetched
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: PathBuf,

    /// Directory the fetched posters are written to
    #[serde(default = "default_poster_dir")]
    pub poster_dir: PathBuf,

    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Maximum number of recommended shows
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("imdb_tvshows.csv")
}

fn default_embeddings_path() -> PathBuf {
    PathBuf::from("imdb_tvshows_embedding.json")
}

fn default_openai_api_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_placeholder_image() -> PathBuf {
    PathBuf::from("error-message.png")
}

fn default_poster_dir() -> PathBuf {
    PathBuf::from("posters")
}

fn default_poster_timeout_secs() -> u64 {
    20
}

fn default_recommendation_limit() -> usize {
    crate::services::recommendations::RECOMMENDATION_LIMIT
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.recommendation_limit == 0 {
            anyhow::bail!("Failed to load config: RECOMMENDATION_LIMIT must be at least 1");
        }

        Ok(config)
    }

    /// The API key, ignoring blank values left over in `.env` files
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
