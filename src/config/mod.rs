//! Configuration module for Lese.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    ChatSettings, EmbeddingSettings, FeedSettings, GeneralSettings, RagSettings, RatingSettings,
    Settings,
};
