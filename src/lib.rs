//! Lese - an AI assistant for arXiv quantum physics papers
//!
//! The name "Lese" comes from the Norwegian word for "read."
//!
//! # Overview
//!
//! Lese lets you:
//! - Chat about quantum physics/computing papers, with streamed replies and
//!   model-requested tool calls (fetch papers for a date, summarize by id)
//! - Run the same conversation through the Assistants API
//! - Rate a day's quant-ph feed against a fixed relevance rubric and rank it
//! - Ask questions answered only from a day's papers, with citations
//! - Try the identical tool-calling loop against a toy concert booking store
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `feed` - Paper feed abstraction (arXiv Atom API)
//! - `booking` - Toy concert booking store
//! - `tools` - Tool catalogues, argument validation and dispatch
//! - `chat` - Streaming conversation loop
//! - `rating` - Rubric-based title rating
//! - `embedding` - Embedding generation
//! - `rag` - Question answering grounded in feed papers
//!
//! # Example
//!
//! ```rust,no_run
//! use lese::config::Settings;
//! use lese::feed::{ArxivFeed, FeedQuery, PaperFeed};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let feed = ArxivFeed::new(&settings.feed.base_url, settings.feed.max_results);
//!
//!     let papers = feed
//!         .fetch_by_query(FeedQuery::QuantumPhysics, chrono::Utc::now().date_naive())
//!         .await?;
//!     println!("{} papers today", papers.len());
//!
//!     Ok(())
//! }
//! ```

pub mod booking;
pub mod chat;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod feed;
pub mod openai;
pub mod rag;
pub mod rating;
pub mod tools;

pub use error::{LeseError, Result};
