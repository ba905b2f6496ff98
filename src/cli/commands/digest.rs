//! Digest command: fetch, rate and rank a day's papers.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::error::{LeseError, Result};
use crate::feed::{ArxivFeed, FeedQuery, PaperFeed};
use crate::openai::create_client;
use crate::rating;
use chrono::{NaiveDate, Utc};
use console::style;

/// Run the digest command.
pub async fn run_digest(
    date: Option<String>,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    preflight::check()?;

    let date = parse_date(date)?;
    let model = model.unwrap_or_else(|| settings.rating.model.clone());

    let feed = ArxivFeed::new(&settings.feed.base_url, settings.feed.max_results);

    let spinner = Output::spinner(&format!("Fetching quant-ph papers for {}...", date));
    let papers = feed.fetch_by_query(FeedQuery::QuantumPhysics, date).await;
    spinner.finish_and_clear();
    let papers = papers?;

    if papers.is_empty() {
        Output::info("No papers today...");
        return Ok(());
    }

    let client = create_client();
    let spinner = Output::spinner(&format!("Rating {} papers...", papers.len()));
    let ratings = rating::rate_papers(&client, &model, settings.rating.max_tokens, &papers).await;
    spinner.finish_and_clear();

    // A rating response wrapped in prose is fatal for the run; there is no
    // conversational loop to recover within.
    let ratings = ratings?;
    let rated = rating::apply_ratings(papers, &ratings);

    Output::header(&format!("quant-ph digest for {} ({} papers)", date, rated.len()));
    println!();
    for (paper, score) in &rated {
        Output::rated_paper_row(*score, &paper.id, &paper.updated_line(), &paper.title);
        if !paper.authors.is_empty() {
            println!("     {}", style(paper.author_line()).dim());
        }
        if let Some(link) = &paper.pdf_link {
            println!("     {}", style(link).dim());
        }
    }

    Ok(())
}

/// Parse a YYYY-MM-DD argument, defaulting to today (UTC).
pub(crate) fn parse_date(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| LeseError::Config(format!("Invalid date '{}': {}", raw, e))),
        None => Ok(Utc::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_explicit() {
        let date = parse_date(Some("2024-02-29".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        let err = parse_date(Some("yesterday".to_string())).unwrap_err();
        assert!(matches!(err, LeseError::Config(_)));
    }

    #[test]
    fn test_parse_date_default_is_today() {
        let date = parse_date(None).unwrap();
        assert_eq!(date, Utc::now().date_naive());
    }
}
