//! arXiv assistant over the Assistants API (threads and runs).
//!
//! Unlike the streaming chat loop, a run in requires-action state must
//! receive an output for every requested tool call before it can resume,
//! so all of them are dispatched here.

use super::chat::{system_instructions, INTRO_MESSAGE};
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::error::{LeseError, Result};
use crate::feed::ArxivFeed;
use crate::openai::create_client;
use crate::tools::{ArxivTools, ToolDispatcher};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    CreateAssistantRequestArgs, CreateMessageRequestArgs, CreateRunRequestArgs,
    CreateThreadRequestArgs, MessageContent, MessageRole, RunObject, RunStatus,
    SubmitToolOutputsRunRequest, ToolsOutputs,
};
use async_openai::Client;
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Poll cadence while a run is queued or in progress.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Run the assistants-API variant of the arXiv chat.
pub async fn run_assistant(model: Option<String>, settings: Settings) -> Result<()> {
    preflight::check()?;

    let model = model.unwrap_or_else(|| settings.chat.model.clone());
    let feed = Arc::new(ArxivFeed::new(&settings.feed.base_url, settings.feed.max_results));
    let tools = Arc::new(ArxivTools::new(feed, &model));

    let client = create_client();

    let assistant_request = CreateAssistantRequestArgs::default()
        .model(&model)
        .name("Arxiv Helper Assistant")
        .instructions(system_instructions())
        .tools(tools.assistant_tools())
        .build()
        .map_err(|e| LeseError::Chat(e.to_string()))?;

    let assistant = client
        .assistants()
        .create(assistant_request)
        .await
        .map_err(|e| LeseError::OpenAI(format!("Failed to create assistant: {}", e)))?;

    let thread = client
        .threads()
        .create(
            CreateThreadRequestArgs::default()
                .build()
                .map_err(|e| LeseError::Chat(e.to_string()))?,
        )
        .await
        .map_err(|e| LeseError::OpenAI(format!("Failed to create thread: {}", e)))?;

    println!("\n{}", style("Lese Arxiv Assistant (threads)").bold().cyan());
    println!("{}\n", style("Type your questions, or 'exit' to quit.").dim());
    println!("{} {}", style("::").cyan().bold(), INTRO_MESSAGE);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style(">").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if let Err(e) = run_thread_turn(&client, &thread.id, &assistant.id, tools.as_ref(), input).await {
            Output::error(&format!("{}", e));
        }
    }

    Ok(())
}

/// One user turn: post the message, poll the run, answer tool calls, print
/// the newest thread message.
async fn run_thread_turn(
    client: &Client<OpenAIConfig>,
    thread_id: &str,
    assistant_id: &str,
    tools: &ArxivTools,
    input: &str,
) -> Result<()> {
    client
        .threads()
        .messages(thread_id)
        .create(
            CreateMessageRequestArgs::default()
                .role(MessageRole::User)
                .content(input)
                .build()
                .map_err(|e| LeseError::Chat(e.to_string()))?,
        )
        .await
        .map_err(|e| LeseError::OpenAI(format!("Failed to post message: {}", e)))?;

    let mut run = client
        .threads()
        .runs(thread_id)
        .create(
            CreateRunRequestArgs::default()
                .assistant_id(assistant_id)
                .build()
                .map_err(|e| LeseError::Chat(e.to_string()))?,
        )
        .await
        .map_err(|e| LeseError::OpenAI(format!("Failed to start run: {}", e)))?;

    loop {
        match run.status {
            RunStatus::Queued | RunStatus::InProgress => {
                tokio::time::sleep(POLL_INTERVAL).await;
                run = client
                    .threads()
                    .runs(thread_id)
                    .retrieve(&run.id)
                    .await
                    .map_err(|e| LeseError::OpenAI(format!("Failed to poll run: {}", e)))?;
            }
            RunStatus::RequiresAction => {
                run = submit_tool_outputs(client, thread_id, &run, tools).await?;
            }
            RunStatus::Completed => break,
            _ => {
                return Err(LeseError::OpenAI(format!(
                    "Run ended with status {:?}",
                    run.status
                )));
            }
        }
    }

    print_last_message(client, thread_id).await
}

/// Dispatch every requested tool call and submit the outputs.
async fn submit_tool_outputs(
    client: &Client<OpenAIConfig>,
    thread_id: &str,
    run: &RunObject,
    tools: &ArxivTools,
) -> Result<RunObject> {
    let Some(action) = &run.required_action else {
        return Err(LeseError::OpenAI(
            "Run requires action but carries none".to_string(),
        ));
    };

    let mut outputs = Vec::new();
    for call in &action.submit_tool_outputs.tool_calls {
        let name = &call.function.name;
        let arguments = &call.function.arguments;
        debug!("Assistant requested tool: {} {}", name, arguments);
        println!(
            "{}",
            style(format!(
                "I'm calling a function called {} with arguments {}... Stay tuned...",
                name, arguments
            ))
            .dim()
        );

        // A dispatch failure still has to produce an output for this call
        // id, so it is folded into the submitted string.
        let output = match tools.dispatch(name, arguments).await {
            Ok(output) => output,
            Err(e) => format!("Error: {}", e),
        };

        outputs.push(ToolsOutputs {
            tool_call_id: Some(call.id.clone()),
            output: Some(output),
        });
    }

    client
        .threads()
        .runs(thread_id)
        .submit_tool_outputs(
            &run.id,
            SubmitToolOutputsRunRequest {
                tool_outputs: outputs,
                stream: None,
            },
        )
        .await
        .map_err(|e| LeseError::OpenAI(format!("Failed to submit tool outputs: {}", e)))
}

/// Print the newest message on the thread.
async fn print_last_message(client: &Client<OpenAIConfig>, thread_id: &str) -> Result<()> {
    let messages = client
        .threads()
        .messages(thread_id)
        .list(&[("limit", "1")])
        .await
        .map_err(|e| LeseError::OpenAI(format!("Failed to list messages: {}", e)))?;

    for message in &messages.data {
        for item in &message.content {
            if let MessageContent::Text(text) = item {
                println!("{} {}", style("::").cyan().bold(), text.text.value);
            }
        }
    }

    Ok(())
}
