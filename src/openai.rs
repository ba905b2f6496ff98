//! OpenAI client construction.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Request timeout for API calls (5 minutes).
const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with a request timeout, to prevent hung calls.
///
/// Credentials and an optional endpoint override are read from the
/// `OPENAI_API_KEY` and `OPENAI_API_BASE` environment variables.
pub fn create_client() -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
