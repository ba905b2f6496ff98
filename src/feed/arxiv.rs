//! arXiv Atom API implementation of the paper feed.

use super::{FeedQuery, Paper, PaperFeed};
use crate::error::{LeseError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

/// Paper feed backed by the arXiv query API.
pub struct ArxivFeed {
    http: reqwest::Client,
    base_url: String,
    max_results: u32,
}

impl ArxivFeed {
    /// Create a feed client for the given API base URL.
    pub fn new(base_url: &str, max_results: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_results,
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<Paper>> {
        debug!("Fetching feed: {}", url);
        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        parse_feed(&body)
    }
}

#[async_trait]
impl PaperFeed for ArxivFeed {
    async fn fetch_by_query(&self, query: FeedQuery, date: NaiveDate) -> Result<Vec<Paper>> {
        let day = date.format("%Y%m%d");
        let url = format!(
            "{}?search_query={}+AND+submittedDate:[{}0000+TO+{}2359]&start=0&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.base_url,
            query.as_search_expression(),
            day,
            day,
            self.max_results,
        );
        self.fetch(&url).await
    }

    async fn fetch_by_id(&self, paper_id: &str) -> Result<Vec<Paper>> {
        let url = format!("{}?id_list={}", self.base_url, paper_id);
        self.fetch(&url).await
    }
}

/// Parse an Atom feed document into paper records.
fn parse_feed(body: &[u8]) -> Result<Vec<Paper>> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| LeseError::Feed(format!("Failed to parse feed: {}", e)))?;

    let papers = feed
        .entries
        .into_iter()
        .map(|entry| Paper {
            id: extract_paper_id(&entry.id),
            title: entry
                .title
                .map(|t| normalize_whitespace(&t.content))
                .unwrap_or_default(),
            summary: entry
                .summary
                .map(|s| s.content.trim().to_string())
                .unwrap_or_default(),
            authors: entry.authors.into_iter().map(|a| a.name).collect(),
            updated: entry.updated,
            published: entry.published,
            pdf_link: entry
                .links
                .into_iter()
                .find(|l| l.title.as_deref() == Some("pdf"))
                .map(|l| l.href),
        })
        .collect();

    Ok(papers)
}

/// Derive a stable paper id from the feed entry identifier.
///
/// Entry ids look like `http://arxiv.org/abs/2401.12345v2`; the id is the
/// last path segment with the version suffix stripped, so repeated fetches
/// of the same paper yield the same id and the id round-trips through
/// `fetch_by_id`.
fn extract_paper_id(entry_id: &str) -> String {
    let segment = entry_id.rsplit('/').next().unwrap_or(entry_id);
    strip_version_suffix(segment).to_string()
}

fn strip_version_suffix(segment: &str) -> &str {
    if let Some(pos) = segment.rfind('v') {
        let (head, tail) = segment.split_at(pos);
        if !head.is_empty() && tail.len() > 1 && tail[1..].chars().all(|c| c.is_ascii_digit()) {
            return head;
        }
    }
    segment
}

/// Collapse whitespace runs; Atom titles arrive hard-wrapped.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <id>http://arxiv.org/api/sample</id>
  <updated>2024-03-01T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/abs/2402.11111v1</id>
    <updated>2024-02-29T12:00:00Z</updated>
    <published>2024-02-29T12:00:00Z</published>
    <title>Quantum Error Correction
  For Dummies</title>
    <summary>  An overview of error correction techniques.  </summary>
    <author><name>Alice Example</name></author>
    <author><name>Bob Example</name></author>
    <link href="http://arxiv.org/abs/2402.11111v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2402.11111v1" rel="related" type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2402.22222v3</id>
    <updated>2024-02-29T09:30:00Z</updated>
    <published>2024-02-28T09:30:00Z</published>
    <title>Hydrogen Atoms Revisited</title>
    <summary>A pedagogical revisit.</summary>
    <author><name>Carol Example</name></author>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed() {
        let papers = parse_feed(SAMPLE_FEED.as_bytes()).unwrap();
        assert_eq!(papers.len(), 2);

        assert_eq!(papers[0].id, "2402.11111");
        assert_eq!(papers[0].title, "Quantum Error Correction For Dummies");
        assert_eq!(papers[0].summary, "An overview of error correction techniques.");
        assert_eq!(papers[0].authors, vec!["Alice Example", "Bob Example"]);
        assert_eq!(
            papers[0].pdf_link.as_deref(),
            Some("http://arxiv.org/pdf/2402.11111v1")
        );

        assert_eq!(papers[1].id, "2402.22222");
        assert!(papers[1].pdf_link.is_none());
    }

    #[test]
    fn test_extract_paper_id() {
        assert_eq!(extract_paper_id("http://arxiv.org/abs/2401.12345v2"), "2401.12345");
        assert_eq!(extract_paper_id("http://arxiv.org/abs/quant-ph/0201082v1"), "0201082");
        // Already-bare ids pass through unchanged.
        assert_eq!(extract_paper_id("2401.12345"), "2401.12345");
    }

    #[test]
    fn test_extract_paper_id_is_stable() {
        let first = extract_paper_id("http://arxiv.org/abs/2401.12345v1");
        let second = extract_paper_id("http://arxiv.org/abs/2401.12345v2");
        assert_eq!(first, second);
    }

    #[test]
    fn test_strip_version_suffix_edge_cases() {
        assert_eq!(strip_version_suffix("v1"), "v1");
        assert_eq!(strip_version_suffix("2401.12345v"), "2401.12345v");
        assert_eq!(strip_version_suffix("2401.12345v12"), "2401.12345");
    }
}
