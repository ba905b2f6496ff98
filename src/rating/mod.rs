//! Model-assisted rating of paper titles.
//!
//! A fixed rubric prompt asks the model to rate every title 1-5 for
//! relevance to quantum computing software engineers. The reply must be a
//! bare JSON array; anything else fails the run, with no retry.

use crate::error::{LeseError, Result};
use crate::feed::Paper;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use serde::Deserialize;

/// One rated entry in the model's reply, `{"Id": ..., "R": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RatedPaper {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "R")]
    pub rating: u8,
}

const RATING_RUBRIC: &str = r#"Rate on a scale of 1-5 how relevant each headline is to quantum computing software engineers.
Titles mentioning quantum frameworks, software, algorithms, machine learning and error correction should be rated highly. Quantum computing hardware topics should be rated lower. Other quantum physics topics should get low rating. Produce JSON result as specified in the output example.

<Input>
1, Quantum Error Correction For Dummies.
2, Quantum Algorithm for Unsupervised Anomaly Detection
3, Fast quantum search algorithm modelling on conventional computers: Information analysis of termination problem.
4, A pedagogical revisit on the hydrogen atom induced by a uniform static electric field

<Output>
[
    {"Id": "1", "R": 5},
    {"Id": "2", "R": 5},
    {"Id": "3", "R": 4},
    {"Id": "4", "R": 1}
]

<Input>"#;

/// Build the rating prompt: rubric and worked examples, then the real
/// id/title pairs and the output marker.
pub fn build_rating_prompt(papers: &[Paper]) -> String {
    let input = papers
        .iter()
        .map(|p| format!("{}, {}", p.id, p.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}\n<Output>", RATING_RUBRIC, input)
}

/// Parse the model reply as a bare JSON array of rated entries.
///
/// Surrounding prose fails the parse; the caller treats that as fatal for
/// the run.
pub fn parse_ratings(raw: &str) -> Result<Vec<RatedPaper>> {
    serde_json::from_str(raw.trim())
        .map_err(|e| LeseError::UnparsableRatingResponse(e.to_string()))
}

/// Ask the model to rate every paper title.
pub async fn rate_papers(
    client: &async_openai::Client<async_openai::config::OpenAIConfig>,
    model: &str,
    max_tokens: u32,
    papers: &[Paper],
) -> Result<Vec<RatedPaper>> {
    let messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestUserMessageArgs::default()
            .content(build_rating_prompt(papers))
            .build()
            .map_err(|e| LeseError::Chat(e.to_string()))?
            .into(),
    ];

    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .temperature(0.0)
        .top_p(1.0)
        .max_tokens(max_tokens)
        .build()
        .map_err(|e| LeseError::Chat(e.to_string()))?;

    let response = client
        .chat()
        .create(request)
        .await
        .map_err(|e| LeseError::OpenAI(format!("Rating API error: {}", e)))?;

    let raw = response
        .choices
        .first()
        .and_then(|c| c.message.content.as_deref())
        .ok_or_else(|| LeseError::OpenAI("No completions found.".to_string()))?;

    parse_ratings(raw)
}

/// Attach ratings to papers by id and sort by rating, then recency.
/// Papers the model did not rate sink to the bottom with rating 0.
pub fn apply_ratings(papers: Vec<Paper>, ratings: &[RatedPaper]) -> Vec<(Paper, u8)> {
    let mut rated: Vec<(Paper, u8)> = papers
        .into_iter()
        .map(|paper| {
            let score = ratings
                .iter()
                .find(|r| r.id == paper.id)
                .map(|r| r.rating)
                .unwrap_or(0);
            (paper, score)
        })
        .collect();

    rated.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.updated.cmp(&a.0.updated)));
    rated
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn paper(id: &str, title: &str, updated_hour: u32) -> Paper {
        Paper {
            id: id.to_string(),
            title: title.to_string(),
            summary: String::new(),
            authors: Vec::new(),
            updated: Some(Utc.with_ymd_and_hms(2024, 2, 29, updated_hour, 0, 0).unwrap()),
            published: None,
            pdf_link: None,
        }
    }

    #[test]
    fn test_prompt_contains_rubric_and_papers() {
        let prompt = build_rating_prompt(&[paper("2402.11111", "Qubit Routing Heuristics", 9)]);
        assert!(prompt.contains("Rate on a scale of 1-5"));
        assert!(prompt.contains("2402.11111, Qubit Routing Heuristics"));
        assert!(prompt.ends_with("<Output>"));
    }

    #[test]
    fn test_parse_ratings_valid() {
        let ratings = parse_ratings(r#"[{"Id": "2402.11111", "R": 5}]"#).unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].id, "2402.11111");
        assert_eq!(ratings[0].rating, 5);
    }

    #[test]
    fn test_parse_ratings_tolerates_surrounding_whitespace() {
        let ratings = parse_ratings("\n  [{\"Id\": \"1\", \"R\": 3}]  \n").unwrap();
        assert_eq!(ratings[0].rating, 3);
    }

    #[test]
    fn test_parse_ratings_rejects_prose() {
        let err = parse_ratings(r#"Here are the ratings: [{"Id": "1", "R": 3}]"#).unwrap_err();
        assert!(matches!(err, LeseError::UnparsableRatingResponse(_)));
    }

    #[test]
    fn test_apply_ratings_sorts_by_rating_then_recency() {
        let papers = vec![
            paper("a", "Low", 10),
            paper("b", "High, older", 8),
            paper("c", "High, newer", 12),
            paper("d", "Unrated", 11),
        ];
        let ratings = vec![
            RatedPaper { id: "a".to_string(), rating: 1 },
            RatedPaper { id: "b".to_string(), rating: 5 },
            RatedPaper { id: "c".to_string(), rating: 5 },
            RatedPaper { id: "ghost".to_string(), rating: 4 },
        ];

        let rated = apply_ratings(papers, &ratings);
        let order: Vec<&str> = rated.iter().map(|(p, _)| p.id.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a", "d"]);
        assert_eq!(rated[3].1, 0);
    }
}
