//! Retrieval-augmented question answering over a day's papers.
//!
//! The "bring your own data" mode: instead of a hosted search index, the
//! context set is the papers submitted on a given day, ranked by embedding
//! similarity to the question.

use crate::embedding::Embedder;
use crate::error::{LeseError, Result};
use crate::feed::{FeedQuery, Paper, PaperFeed};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

const ASK_SYSTEM_PROMPT: &str = "You are an AI assistant answering questions about arXiv quantum physics papers. \
Answer only from the paper excerpts provided in the user message, and cite the excerpts you used as [doc1], [doc2] and so on. \
If the excerpts do not contain an answer, say so instead of guessing.";

/// A context paper with its similarity score to the question.
#[derive(Debug, Clone)]
pub struct PaperContext {
    pub paper: Paper,
    pub score: f32,
}

/// An answer plus the papers it was grounded in.
#[derive(Debug, Clone)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<PaperContext>,
}

/// Question answering engine grounded in feed papers.
pub struct AskEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    feed: Arc<dyn PaperFeed>,
    embedder: Arc<dyn Embedder>,
    model: String,
    max_context_papers: usize,
    min_score: f32,
}

impl AskEngine {
    pub fn new(
        feed: Arc<dyn PaperFeed>,
        embedder: Arc<dyn Embedder>,
        model: &str,
        max_context_papers: usize,
        min_score: f32,
    ) -> Self {
        Self {
            client: create_client(),
            feed,
            embedder,
            model: model.to_string(),
            max_context_papers,
            min_score,
        }
    }

    /// Answer a question using the papers submitted on `date` as context.
    ///
    /// A day without papers, or without relevant ones, yields a canned
    /// answer through the success path rather than an error.
    pub async fn ask(&self, question: &str, date: NaiveDate) -> Result<AskResponse> {
        let papers = self.feed.fetch_by_query(FeedQuery::QuantumPhysics, date).await?;
        if papers.is_empty() {
            return Ok(AskResponse {
                answer: format!("No papers were submitted on {}; nothing to answer from.", date),
                sources: Vec::new(),
            });
        }

        let texts: Vec<String> = papers
            .iter()
            .map(|p| format!("{}\n\n{}", p.title, p.summary))
            .collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        let question_embedding = self.embedder.embed(question).await?;

        let ranked = rank(
            &embeddings,
            &question_embedding,
            self.max_context_papers,
            self.min_score,
        );
        if ranked.is_empty() {
            return Ok(AskResponse {
                answer: "None of the day's papers look relevant to this question.".to_string(),
                sources: Vec::new(),
            });
        }

        let sources: Vec<PaperContext> = ranked
            .into_iter()
            .map(|(i, score)| PaperContext {
                paper: papers[i].clone(),
                score,
            })
            .collect();

        debug!("Answering with {} context papers", sources.len());

        let answer = self.complete(question, &sources).await?;
        Ok(AskResponse { answer, sources })
    }

    async fn complete(&self, question: &str, sources: &[PaperContext]) -> Result<String> {
        let excerpts = sources
            .iter()
            .enumerate()
            .map(|(i, s)| format!("[doc{}] {}\n{}", i + 1, s.paper.title, s.paper.summary))
            .collect::<Vec<_>>()
            .join("\n\n");

        let user_prompt = format!("Question: {}\n\nPaper excerpts:\n\n{}", question, excerpts);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(ASK_SYSTEM_PROMPT)
                .build()
                .map_err(|e| LeseError::Chat(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| LeseError::Chat(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(1.0)
            .top_p(1.0)
            .max_tokens(400u32)
            .build()
            .map_err(|e| LeseError::Chat(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LeseError::OpenAI(format!("Ask API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| LeseError::OpenAI("Empty response from model".to_string()))
    }
}

/// Rank context candidates by cosine similarity, keeping the top `limit`
/// at or above `min_score`.
fn rank(embeddings: &[Vec<f32>], query: &[f32], limit: usize, min_score: f32) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = embeddings
        .iter()
        .enumerate()
        .map(|(i, e)| (i, cosine_similarity(e, query)))
        .filter(|(_, score)| *score >= min_score)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_by_similarity() {
        let embeddings = vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.7, 0.7],
        ];
        let query = vec![1.0, 0.0];

        let ranked = rank(&embeddings, &query, 2, 0.1);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 1);
        assert_eq!(ranked[1].0, 2);
    }

    #[test]
    fn test_rank_respects_min_score() {
        let embeddings = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let query = vec![1.0, 0.0];

        let ranked = rank(&embeddings, &query, 5, 0.5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, 1);
    }
}
