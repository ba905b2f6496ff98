//! Interactive concert booking assistant command.

use super::chat::{run_repl, session_options};
use crate::booking::ConcertApi;
use crate::chat::ChatSession;
use crate::cli::preflight;
use crate::config::Settings;
use crate::error::Result;
use crate::tools::BookingTools;
use chrono::{Duration, Local};
use std::sync::Arc;

const INTRO_MESSAGE: &str = "I'm a Concert Booking AI assistant! Ask me about concerts and I \
can help you find them and book tickets!";

/// System instructions for the booking assistant, grounded to today's date.
fn system_instructions() -> String {
    let today = Local::now();
    let yesterday = today - Duration::days(1);
    let tomorrow = today + Duration::days(1);

    format!(
        r#"You are an AI assistant designed to support users in searching and booking concert tickets. Adhere to the following rules rigorously:

1. **Direct Parameter Requirement:**
When a user requests an action, directly related to the functions, you must never infer or generate parameter values, especially IDs, band names or locations on your own.
If a parameter is needed for a function call and the user has not provided it, you must explicitly ask the user to provide this specific information.

2. **Avoid Assumptions:**
Do not make assumptions about parameter values.
If the user's request lacks clarity or omits necessary details for function execution, you are required to ask follow-up questions to clarify parameter values.

3. **User Clarification:**
If a user's request is ambiguous or incomplete, you should not proceed with function invocation.
Instead, ask for the missing information to ensure the function can be executed accurately and effectively.

4. **Grounding in Time:**
Today is {today}.
Yesterday was {yesterday}. You will correctly infer past dates.
Tomorrow will be {tomorrow}."#,
        today = today.format("%A, %e %B %Y"),
        yesterday = yesterday.format("%A, %e %B %Y"),
        tomorrow = tomorrow.format("%A, %e %B %Y"),
    )
}

/// Run the interactive concert booking command.
pub async fn run_concerts(model: Option<String>, settings: Settings) -> Result<()> {
    preflight::check()?;

    let model = model.unwrap_or_else(|| settings.chat.model.clone());
    let tools = Arc::new(BookingTools::new(ConcertApi::new()));

    let session = ChatSession::new(
        tools,
        &model,
        &system_instructions(),
        INTRO_MESSAGE,
        session_options(&settings),
    );

    run_repl(session, "Lese Concert Booking", INTRO_MESSAGE).await
}
