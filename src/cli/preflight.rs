//! Pre-flight checks before commands that call the model endpoint.
//!
//! A missing credential should fail before the first conversation turn,
//! not midway through a session.

use crate::error::{LeseError, Result};

/// Verify that required credentials are present in the environment.
pub fn check() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(LeseError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(LeseError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}
