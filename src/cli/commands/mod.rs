//! CLI command implementations.

mod ask;
mod assistant;
mod chat;
mod concerts;
mod config;
mod digest;
mod doctor;

pub use ask::run_ask;
pub use assistant::run_assistant;
pub use chat::run_chat;
pub use concerts::run_concerts;
pub use config::run_config;
pub use digest::run_digest;
pub use doctor::run_doctor;
