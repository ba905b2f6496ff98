//! Configuration settings for Lese.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chat: ChatSettings,
    pub feed: FeedSettings,
    pub embedding: EmbeddingSettings,
    pub rag: RagSettings,
    pub rating: RatingSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Interactive chat settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// LLM model for conversation turns.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Token budget per model turn.
    pub max_tokens: u32,
    /// Sliding history window: oldest non-system messages are evicted once
    /// the history grows past this bound.
    pub history_limit: usize,
    /// Upper bound on dispatch-and-feed-back cycles within one user turn.
    pub max_tool_turns: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: 400,
            history_limit: 15,
            max_tool_turns: 10,
        }
    }
}

/// Paper feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Base URL of the arXiv query API.
    pub base_url: String,
    /// Result cap per feed request.
    pub max_results: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: "https://export.arxiv.org/api/query".to_string(),
            max_results: 40,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Settings for answering questions grounded in feed papers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for answer generation.
    pub model: String,
    /// Maximum number of papers used as context.
    pub max_context_papers: usize,
    /// Minimum similarity score for a paper to qualify as context.
    pub min_score: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_context_papers: 3,
            min_score: 0.1,
        }
    }
}

/// Settings for the daily digest rating run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    /// LLM model for title rating.
    pub model: String,
    /// Token budget for the rating response.
    pub max_tokens: u32,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 2400,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or the default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lese")
            .join("config.toml")
    }
}
