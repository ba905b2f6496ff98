//! Interactive arXiv assistant command.

use crate::chat::{ChatSession, SessionOptions};
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::error::Result;
use crate::feed::ArxivFeed;
use crate::tools::ArxivTools;
use chrono::{Duration, Local};
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

pub(crate) const INTRO_MESSAGE: &str = "I'm an Arxiv AI Assistant! Ask me about quantum \
computing/physics papers from a given day, or ask me to summarize a paper!";

/// System instructions for the arXiv assistant, grounded to today's date.
pub(crate) fn system_instructions() -> String {
    let today = Local::now();
    let yesterday = today - Duration::days(1);
    let tomorrow = today + Duration::days(1);

    format!(
        r#"You are an AI assistant designed to support users in navigating the ArXiv browser application, focusing on functions related to quantum physics and quantum computing research.
The application features specific functions that allow users to fetch papers and summarize them based on precise criteria. Adhere to the following rules rigorously:

1. **Direct Parameter Requirement:**
When a user requests an action, directly related to the functions, you must never infer or generate parameter values, especially paper IDs, on your own.
If a parameter is needed for a function call and the user has not provided it, you must explicitly ask the user to provide this specific information.

2. **Mandatory Explicit Parameters:**
For the function `summarize_paper`, the `paper_id` parameter is mandatory and must be provided explicitly by the user.
If a user asks for a paper summary without providing a paper ID, you must ask the user to provide it.

3. **Avoid Assumptions:**
Do not make assumptions about parameter values.
If the user's request lacks clarity or omits necessary details for function execution, you are required to ask follow-up questions to clarify parameter values.

4. **User Clarification:**
If a user's request is ambiguous or incomplete, you should not proceed with function invocation.
Instead, ask for the missing information to ensure the function can be executed accurately and effectively.

5. **Grounding in Time:**
Today is {today}. When the user asks about papers from today, you will use that date.
Yesterday was {yesterday}. You will correctly infer past dates.
Tomorrow will be {tomorrow}. You will ignore requests for papers from the future."#,
        today = today.format("%A, %e %B %Y"),
        yesterday = yesterday.format("%A, %e %B %Y"),
        tomorrow = tomorrow.format("%A, %e %B %Y"),
    )
}

/// Run the interactive arXiv chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    preflight::check()?;

    let model = model.unwrap_or_else(|| settings.chat.model.clone());
    let feed = Arc::new(ArxivFeed::new(&settings.feed.base_url, settings.feed.max_results));
    let tools = Arc::new(ArxivTools::new(feed, &model));

    let session = ChatSession::new(
        tools,
        &model,
        &system_instructions(),
        INTRO_MESSAGE,
        session_options(&settings),
    );

    run_repl(session, "Lese Arxiv Assistant", INTRO_MESSAGE).await
}

/// Session options from the chat section of the settings.
pub(crate) fn session_options(settings: &Settings) -> SessionOptions {
    SessionOptions {
        temperature: settings.chat.temperature,
        max_tokens: settings.chat.max_tokens,
        history_limit: settings.chat.history_limit,
        max_tool_turns: settings.chat.max_tool_turns,
    }
}

/// Drive the line-oriented REPL over a chat session.
pub(crate) async fn run_repl(mut session: ChatSession, banner: &str, intro: &str) -> Result<()> {
    println!("\n{}", style(banner).bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );
    println!("{} {}", style("::").cyan().bold(), intro);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style(">").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }
        if input.eq_ignore_ascii_case("clear") {
            session.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        print!("{} ", style("::").cyan().bold());
        stdout.flush()?;

        // A failed turn is reported and the loop continues; committed
        // history stays intact.
        if let Err(e) = session.run_turn(input).await {
            Output::error(&format!("{}", e));
        }

        println!();
    }

    Ok(())
}
