//! Interactive conversation loop with streaming tool calling.
//!
//! One committed message history per session, with the system instruction
//! permanently at index 0. Each user turn streams a model reply; content
//! deltas echo straight to stdout while tool-call fragments accumulate per
//! call index. When the stream ends with a complete tool call, the call is
//! dispatched and its result fed back to the model for a further turn; a
//! turn that ends without a tool call returns control to the user.

mod stream;

pub use stream::{PendingToolCall, ToolCallAccumulator};

use crate::error::{LeseError, Result};
use crate::openai::create_client;
use crate::tools::ToolDispatcher;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
};
use console::style;
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Tuning knobs for a chat session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Sliding history window: oldest non-system messages are evicted once
    /// the history grows past this bound.
    pub history_limit: usize,
    /// Upper bound on dispatch-and-feed-back cycles within one user turn.
    pub max_tool_turns: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 400,
            history_limit: 15,
            max_tool_turns: 10,
        }
    }
}

/// One interactive session over a tool catalogue.
pub struct ChatSession {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dispatcher: Arc<dyn ToolDispatcher>,
    messages: Vec<ChatCompletionRequestMessage>,
    options: SessionOptions,
}

impl ChatSession {
    /// Create a session seeded with a system instruction and an intro
    /// message from the assistant.
    pub fn new(
        dispatcher: Arc<dyn ToolDispatcher>,
        model: &str,
        system_instructions: &str,
        intro_message: &str,
        options: SessionOptions,
    ) -> Self {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_instructions)
            .build()
            .expect("Failed to build system message");
        let intro = ChatCompletionRequestAssistantMessageArgs::default()
            .content(intro_message)
            .build()
            .expect("Failed to build intro message");

        Self {
            client: create_client(),
            model: model.to_string(),
            dispatcher,
            messages: vec![system.into(), intro.into()],
            options,
        }
    }

    /// Reset the conversation, keeping only the system instruction.
    pub fn clear_history(&mut self) {
        self.messages.truncate(1);
    }

    /// Run one user turn.
    ///
    /// A transport error discards the partially streamed reply; committed
    /// history is never left in an inconsistent state.
    pub async fn run_turn(&mut self, user_input: &str) -> Result<()> {
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(user_input)
            .build()
            .map_err(|e| LeseError::Chat(e.to_string()))?;
        self.messages.push(user.into());

        let mut turns = 0;
        loop {
            turns += 1;
            if turns > self.options.max_tool_turns {
                return Err(LeseError::Chat(format!(
                    "Exceeded {} tool turns for one input",
                    self.options.max_tool_turns
                )));
            }

            self.trim_history();
            debug!("Model turn {}, {} messages in history", turns, self.messages.len());

            let (content, call) = self.stream_model_turn().await?;

            // The stream completed; commit what the turn produced.
            if !content.is_empty() {
                let assistant = ChatCompletionRequestAssistantMessageArgs::default()
                    .content(content.as_str())
                    .build()
                    .map_err(|e| LeseError::Chat(e.to_string()))?;
                self.messages.push(assistant.into());
            }

            let Some(call) = call else {
                return Ok(());
            };

            println!();
            println!(
                "{}",
                style(format!(
                    "I'm calling a function called {} with arguments {}... Stay tuned...",
                    call.name, call.arguments
                ))
                .dim()
            );

            match self.dispatcher.dispatch(&call.name, &call.arguments).await {
                Ok(output) => {
                    println!("{}", output);
                    self.commit_tool_exchange(&call, &output)?;
                    // Hand the result back to the model for one more turn.
                }
                Err(e) => {
                    // Visible but non-fatal; nothing about the failed call
                    // is committed to history.
                    eprintln!("{} Tool call failed: {}", style(">>").red().bold(), e);
                    return Ok(());
                }
            }
        }
    }

    /// Stream one model turn, echoing content deltas and reassembling tool
    /// call fragments in arrival order.
    async fn stream_model_turn(&mut self) -> Result<(String, Option<PendingToolCall>)> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.messages.clone())
            .tools(self.dispatcher.chat_tools())
            .temperature(self.options.temperature)
            .max_tokens(self.options.max_tokens)
            .build()
            .map_err(|e| LeseError::Chat(e.to_string()))?;

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| LeseError::OpenAI(format!("Chat API error: {}", e)))?;

        let mut content = String::new();
        let mut calls = ToolCallAccumulator::new();

        while let Some(next) = stream.next().await {
            let response = next.map_err(|e| LeseError::OpenAI(format!("Stream error: {}", e)))?;

            for choice in &response.choices {
                if let Some(delta) = &choice.delta.content {
                    print!("{}", delta);
                    std::io::stdout().flush().ok();
                    content.push_str(delta);
                }
                if let Some(chunks) = &choice.delta.tool_calls {
                    calls.absorb(chunks);
                }
            }
        }

        Ok((content, calls.into_first_call()))
    }

    /// Commit a successful tool call: the assistant's announcement followed
    /// by the tool's result.
    fn commit_tool_exchange(&mut self, call: &PendingToolCall, output: &str) -> Result<()> {
        let announcement = ChatCompletionRequestAssistantMessageArgs::default()
            .tool_calls(vec![ChatCompletionMessageToolCall {
                id: call.id.clone(),
                r#type: ChatCompletionToolType::Function,
                function: FunctionCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                },
            }])
            .build()
            .map_err(|e| LeseError::Chat(e.to_string()))?;
        self.messages.push(announcement.into());

        let result = ChatCompletionRequestToolMessageArgs::default()
            .tool_call_id(call.id.as_str())
            .content(output)
            .build()
            .map_err(|e| LeseError::Chat(e.to_string()))?;
        self.messages.push(result.into());

        Ok(())
    }

    /// Evict the oldest non-system messages until the history fits the
    /// configured window. The system instruction at index 0 is permanent.
    fn trim_history(&mut self) {
        while self.messages.len() > self.options.history_limit {
            self.messages.remove(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::ConcertApi;
    use crate::tools::BookingTools;

    fn test_session(history_limit: usize) -> ChatSession {
        ChatSession::new(
            Arc::new(BookingTools::new(ConcertApi::new())),
            "gpt-4o-mini",
            "You are a test assistant.",
            "Hello!",
            SessionOptions {
                history_limit,
                ..SessionOptions::default()
            },
        )
    }

    fn user_message(text: &str) -> ChatCompletionRequestMessage {
        ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn test_trim_history_keeps_system_message() {
        let mut session = test_session(15);
        for i in 0..30 {
            session.messages.push(user_message(&format!("message {}", i)));
        }

        session.trim_history();

        assert_eq!(session.messages.len(), 15);
        assert!(matches!(
            session.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
        // The newest message survives eviction.
        assert!(matches!(
            session.messages.last(),
            Some(ChatCompletionRequestMessage::User(_))
        ));
    }

    #[test]
    fn test_trim_history_noop_under_limit() {
        let mut session = test_session(15);
        session.messages.push(user_message("hi"));

        session.trim_history();
        assert_eq!(session.messages.len(), 3);
    }

    #[test]
    fn test_clear_history_keeps_only_system() {
        let mut session = test_session(15);
        session.messages.push(user_message("hi"));

        session.clear_history();
        assert_eq!(session.messages.len(), 1);
        assert!(matches!(
            session.messages[0],
            ChatCompletionRequestMessage::System(_)
        ));
    }

    #[test]
    fn test_commit_tool_exchange_appends_announcement_and_result() {
        let mut session = test_session(15);
        let call = PendingToolCall {
            id: "call_1".to_string(),
            name: "search_concerts".to_string(),
            arguments: r#"{"band": "Iron Maiden", "location": "Zurich"}"#.to_string(),
        };

        session.commit_tool_exchange(&call, "[]").unwrap();

        let n = session.messages.len();
        assert!(matches!(
            session.messages[n - 2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(
            session.messages[n - 1],
            ChatCompletionRequestMessage::Tool(_)
        ));
    }
}
