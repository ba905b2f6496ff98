//! arXiv paper tools: fetch-by-date and summarize-by-id.

use super::{find_spec, DispatchError, ToolArguments, ToolDispatcher, ToolParam, ToolSpec};
use crate::feed::{FeedQuery, Paper, PaperFeed};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

const SUMMARIZE_SYSTEM_PROMPT: &str = "You are a summarization engine for ArXiv papers. \
You will take in input in the form of paper title and abstract, and summarize them in a digestible 1-2 sentence format. \
Each summary should be a simple, plain text, separate paragraph.";

/// Tools for browsing and summarizing arXiv papers.
pub struct ArxivTools {
    feed: Arc<dyn PaperFeed>,
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    catalogue: Vec<ToolSpec>,
}

impl ArxivTools {
    /// Create the arXiv tool catalogue over a paper feed. The model is used
    /// for the summarization sub-call.
    pub fn new(feed: Arc<dyn PaperFeed>, model: &str) -> Self {
        Self {
            feed,
            client: create_client(),
            model: model.to_string(),
            catalogue: build_catalogue(),
        }
    }

    async fn fetch_papers(&self, args: &ToolArguments) -> Result<String, DispatchError> {
        let query: FeedQuery = args
            .str("search_query")?
            .parse()
            .map_err(DispatchError::MalformedArguments)?;
        let date = NaiveDate::parse_from_str(args.str("date")?, "%Y-%m-%d")
            .map_err(|e| DispatchError::MalformedArguments(format!("date: {}", e)))?;

        let papers = self
            .feed
            .fetch_by_query(query, date)
            .await
            .map_err(|e| DispatchError::Adapter(e.to_string()))?;

        Ok(format_paper_list(&papers))
    }

    async fn summarize_paper(&self, args: &ToolArguments) -> Result<String, DispatchError> {
        let paper_id = args.str("paper_id")?;
        let matches = self
            .feed
            .fetch_by_id(paper_id)
            .await
            .map_err(|e| DispatchError::Adapter(e.to_string()))?;

        // Misses and ambiguity are conversational answers, not errors; the
        // model relays them to the user.
        if matches.is_empty() {
            return Ok("Paper not found".to_string());
        }
        if matches.len() > 1 {
            return Ok("More than one match for this ID!".to_string());
        }

        self.summarize(&matches[0]).await
    }

    async fn summarize(&self, paper: &Paper) -> Result<String, DispatchError> {
        let prompt = format!("Title: {}\nAbstract: {}", paper.title, paper.summary);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SUMMARIZE_SYSTEM_PROMPT)
                .build()
                .map_err(|e| DispatchError::Adapter(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| DispatchError::Adapter(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(400u32)
            .build()
            .map_err(|e| DispatchError::Adapter(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| DispatchError::Adapter(format!("Summarization API error: {}", e)))?;

        let summary = response.choices.first().and_then(|c| c.message.content.clone());

        match summary {
            Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            _ => Ok("No response available".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl ToolDispatcher for ArxivTools {
    fn catalogue(&self) -> &[ToolSpec] {
        &self.catalogue
    }

    async fn dispatch(&self, name: &str, raw_arguments: &str) -> Result<String, DispatchError> {
        let spec = find_spec(&self.catalogue, name)?;
        let args = spec.parse_arguments(raw_arguments)?;
        info!("Dispatching tool: {}", name);

        match name {
            "fetch_papers" => self.fetch_papers(&args).await,
            "summarize_paper" => self.summarize_paper(&args).await,
            _ => Err(DispatchError::UnknownTool(name.to_string())),
        }
    }
}

fn build_catalogue() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new(
            "fetch_papers",
            "Fetches quantum physics or quantum computing papers from ArXiv for a given date",
            vec![
                ToolParam::enumeration(
                    "search_query",
                    "Paper category to search",
                    &["QuantumPhysics", "QuantumComputing"],
                ),
                ToolParam::string("date", "Submission date, formatted as YYYY-MM-DD"),
            ],
        ),
        ToolSpec::new(
            "summarize_paper",
            "Summarizes a given paper based on the ArXiv ID of the paper.",
            vec![ToolParam::string("paper_id", "The ArXiv ID of the paper")],
        ),
    ]
}

/// Format fetched papers as display rows, in feed order.
fn format_paper_list(papers: &[Paper]) -> String {
    if papers.is_empty() {
        return "No items to show...".to_string();
    }

    papers
        .iter()
        .map(|p| {
            format!(
                "{} | {} | {} | {} | {}",
                p.id,
                p.updated_line(),
                p.title,
                p.author_line(),
                p.pdf_link.as_deref().unwrap_or("-"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as LeseResult;

    struct StubFeed {
        papers: Vec<Paper>,
    }

    #[async_trait::async_trait]
    impl PaperFeed for StubFeed {
        async fn fetch_by_query(&self, _query: FeedQuery, _date: NaiveDate) -> LeseResult<Vec<Paper>> {
            Ok(self.papers.clone())
        }

        async fn fetch_by_id(&self, paper_id: &str) -> LeseResult<Vec<Paper>> {
            Ok(self
                .papers
                .iter()
                .filter(|p| p.id == paper_id)
                .cloned()
                .collect())
        }
    }

    fn paper(id: &str, title: &str) -> Paper {
        Paper {
            id: id.to_string(),
            title: title.to_string(),
            summary: "An abstract.".to_string(),
            authors: vec!["A. Author".to_string()],
            updated: None,
            published: None,
            pdf_link: None,
        }
    }

    fn tools_with(papers: Vec<Paper>) -> ArxivTools {
        ArxivTools::new(Arc::new(StubFeed { papers }), "gpt-4o-mini")
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let tools = tools_with(vec![]);
        let err = tools.dispatch("order_pizza", "{}").await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_dispatch_missing_date() {
        let tools = tools_with(vec![]);
        let err = tools
            .dispatch("fetch_papers", r#"{"search_query": "QuantumPhysics"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::MissingRequiredParameter(name) if name == "date"));
    }

    #[tokio::test]
    async fn test_dispatch_invalid_search_query() {
        let tools = tools_with(vec![]);
        let err = tools
            .dispatch(
                "fetch_papers",
                r#"{"search_query": "AstroPhysics", "date": "2024-02-29"}"#,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidEnumValue { .. }));
    }

    #[tokio::test]
    async fn test_dispatch_unparseable_date() {
        let tools = tools_with(vec![]);
        let err = tools
            .dispatch(
                "fetch_papers",
                r#"{"search_query": "QuantumPhysics", "date": "February 29"}"#,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::MalformedArguments(_)));
    }

    #[tokio::test]
    async fn test_fetch_papers_empty_feed() {
        let tools = tools_with(vec![]);
        let output = tools
            .dispatch(
                "fetch_papers",
                r#"{"search_query": "QuantumPhysics", "date": "2024-02-29"}"#,
            )
            .await
            .unwrap();
        assert_eq!(output, "No items to show...");
    }

    #[tokio::test]
    async fn test_summarize_paper_not_found() {
        let tools = tools_with(vec![paper("2402.11111", "Some Paper")]);
        let output = tools
            .dispatch("summarize_paper", r#"{"paper_id": "9999.9999"}"#)
            .await
            .unwrap();
        assert_eq!(output, "Paper not found");
    }

    #[tokio::test]
    async fn test_summarize_paper_ambiguous_id() {
        let tools = tools_with(vec![
            paper("2402.11111", "First Match"),
            paper("2402.11111", "Second Match"),
        ]);
        let output = tools
            .dispatch("summarize_paper", r#"{"paper_id": "2402.11111"}"#)
            .await
            .unwrap();
        assert_eq!(output, "More than one match for this ID!");
    }

    #[test]
    fn test_format_paper_list_rows() {
        let rows = format_paper_list(&[paper("2402.11111", "Some Paper")]);
        assert!(rows.contains("2402.11111"));
        assert!(rows.contains("Some Paper"));
        assert!(rows.contains("A. Author"));
    }
}
