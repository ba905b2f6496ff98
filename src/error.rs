//! Error types for Lese.

use thiserror::Error;

/// Library-level error type for Lese operations.
#[derive(Error, Debug)]
pub enum LeseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Rating response was not a bare JSON array: {0}")]
    UnparsableRatingResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Failures raised at the tool dispatch boundary.
///
/// The conversation loop catches these, reports them, and keeps going; a
/// failed dispatch never terminates a session.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("malformed tool arguments: {0}")]
    MalformedArguments(String),

    #[error("missing required parameter: {0}")]
    MissingRequiredParameter(String),

    #[error("invalid value '{value}' for parameter '{param}'")]
    InvalidEnumValue { param: String, value: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("tool execution failed: {0}")]
    Adapter(String),
}

/// Result type alias for Lese operations.
pub type Result<T> = std::result::Result<T, LeseError>;
