//! Paper feed abstraction.
//!
//! Provides a trait-based contract for fetching paper records, with an
//! arXiv-backed implementation.

mod arxiv;

pub use arxiv::ArxivFeed;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// A single paper fetched from the feed. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Paper {
    /// Stable identifier derived from the feed entry id.
    pub id: String,
    pub title: String,
    /// Abstract text.
    pub summary: String,
    /// Author names, in feed order.
    pub authors: Vec<String>,
    pub updated: Option<DateTime<Utc>>,
    pub published: Option<DateTime<Utc>>,
    pub pdf_link: Option<String>,
}

impl Paper {
    /// Comma-separated author list for display.
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// Updated timestamp formatted for display, or a dash when the feed
    /// did not carry one.
    pub fn updated_line(&self) -> String {
        self.updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Search category selector for feed queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedQuery {
    /// Everything in the quant-ph category.
    QuantumPhysics,
    /// Title search for "quantum computing".
    QuantumComputing,
}

impl FeedQuery {
    /// The raw search expression sent to the feed.
    pub fn as_search_expression(&self) -> &'static str {
        match self {
            FeedQuery::QuantumPhysics => "cat:quant-ph",
            FeedQuery::QuantumComputing => "ti:\"quantum computing\"",
        }
    }
}

impl std::str::FromStr for FeedQuery {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "QuantumPhysics" => Ok(FeedQuery::QuantumPhysics),
            "QuantumComputing" => Ok(FeedQuery::QuantumComputing),
            _ => Err(format!("Unknown search query: {}", s)),
        }
    }
}

/// Contract for fetching paper records.
#[async_trait]
pub trait PaperFeed: Send + Sync {
    /// Fetch papers matching a category for a given submission date,
    /// newest first as returned by the feed.
    async fn fetch_by_query(&self, query: FeedQuery, date: NaiveDate) -> Result<Vec<Paper>>;

    /// Fetch papers by id. Returns a list because an id may be ambiguous.
    async fn fetch_by_id(&self, paper_id: &str) -> Result<Vec<Paper>>;
}
