//! Ask command: question answering grounded in a day's papers.

use super::digest::parse_date;
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::error::Result;
use crate::feed::ArxivFeed;
use crate::rag::AskEngine;
use std::sync::Arc;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    date: Option<String>,
    max_papers: usize,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    preflight::check()?;

    let date = parse_date(date)?;
    let model = model.unwrap_or_else(|| settings.rag.model.clone());

    let feed = Arc::new(ArxivFeed::new(&settings.feed.base_url, settings.feed.max_results));
    let embedder = Arc::new(OpenAIEmbedder::new(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));

    let engine = AskEngine::new(feed, embedder, &model, max_papers, settings.rag.min_score);

    let spinner = Output::spinner("Reading the day's papers...");
    let response = engine.ask(question, date).await;
    spinner.finish_and_clear();

    match response {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                let body = response
                    .sources
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        format!(
                            "[doc{}] {} (score: {:.2})\n       {}",
                            i + 1,
                            s.paper.title,
                            s.score,
                            s.paper.pdf_link.as_deref().unwrap_or("-"),
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                Output::panel("References", &body);
            }

            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to answer: {}", e));
            Err(e)
        }
    }
}
