use crate::api::response::{latest_assistant_reply, NO_ASSISTANT_RESPONSE};
use crate::api::AssistantBackend;
use crate::config::{AssistantSettings, RunSettings};
use crate::error::Result;
use crate::local_tools::{format_tools_for_llm, ToolRegistry};
use crate::orchestrator::{with_resend_retries, with_retries, RunController};
use crate::ui::{
    display_assistant_reply, display_notice, display_turn_failure, log_verbose,
};
use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const MESSAGE_PAGE_SIZE: u32 = 20;

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Quit,
    Empty,
    Text(String),
}

pub fn classify_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Empty
    } else if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
        Input::Quit
    } else {
        Input::Text(trimmed.to_string())
    }
}

/// Make sure an assistant exists that knows the registry's tools; returns its id.
///
/// An existing assistant whose tool update fails is still used.
pub async fn ensure_assistant(
    backend: &dyn AssistantBackend,
    registry: &ToolRegistry,
    settings: &AssistantSettings,
    verbose: bool,
) -> Result<String> {
    let tools = format_tools_for_llm(registry);

    match &settings.id {
        Some(id) => {
            match backend.update_assistant_tools(id, &tools).await {
                Ok(_) => log_verbose(
                    verbose,
                    "api",
                    format!("Assistant {} updated with {} tool(s)", id, tools.len()),
                ),
                Err(e) => display_notice(&format!(
                    "Warning: could not update tools on assistant {}: {}",
                    id, e
                )),
            }
            Ok(id.clone())
        }
        None => {
            let assistant = backend
                .create_assistant(
                    &settings.model,
                    &settings.name,
                    &settings.instructions,
                    &tools,
                )
                .await?;
            log_verbose(
                verbose,
                "api",
                format!("Created assistant {} ({})", assistant.id, settings.model),
            );
            Ok(assistant.id)
        }
    }
}

/// One remote thread plus everything needed to run turns against it.
pub struct Conversation<'a> {
    backend: &'a dyn AssistantBackend,
    registry: &'a ToolRegistry,
    assistant_id: String,
    thread_id: String,
    run_instructions: Option<String>,
    settings: RunSettings,
    verbose: bool,
}

impl<'a> Conversation<'a> {
    pub async fn start(
        backend: &'a dyn AssistantBackend,
        registry: &'a ToolRegistry,
        assistant_id: String,
        run_instructions: Option<String>,
        settings: RunSettings,
        verbose: bool,
    ) -> Result<Self> {
        let thread = with_retries(&settings, "create thread", verbose, || {
            backend.create_thread()
        })
        .await?;
        log_verbose(verbose, "api", format!("Thread created with ID: {}", thread.id));

        Ok(Self {
            backend,
            registry,
            assistant_id,
            thread_id: thread.id,
            run_instructions,
            settings,
            verbose,
        })
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Append `text`, run the assistant to completion and return its newest reply.
    pub async fn turn(&self, text: &str) -> Result<String> {
        let backend = self.backend;
        let thread_id = self.thread_id.as_str();

        with_resend_retries(&self.settings, "add message", self.verbose, || {
            backend.add_message(thread_id, text)
        })
        .await?;

        let controller =
            RunController::new(backend, self.registry, self.settings.clone(), self.verbose);
        let completed = controller
            .execute(
                thread_id,
                &self.assistant_id,
                self.run_instructions.as_deref(),
            )
            .await?;
        log_verbose(
            self.verbose,
            "run",
            format!(
                "Run {} completed after {} poll(s), {} tool output(s)",
                completed.run.id, completed.polls, completed.tool_outputs_submitted
            ),
        );

        let messages = with_retries(&self.settings, "list messages", self.verbose, || {
            backend.list_messages(thread_id, MESSAGE_PAGE_SIZE)
        })
        .await?;

        Ok(latest_assistant_reply(&messages).unwrap_or_else(|| NO_ASSISTANT_RESPONSE.to_string()))
    }
}

/// Read lines until `quit`/`exit` or end of input. Turn failures are reported and skipped.
pub async fn run_interactive<R>(conversation: &Conversation<'_>, reader: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        print!("\n{} ", "You:".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!("\nExiting conversation (end of input).");
            break;
        };

        match classify_input(&line) {
            Input::Quit => {
                println!("Exiting conversation.");
                break;
            }
            Input::Empty => {
                display_notice("No input received, please type a message or 'quit'/'exit'.");
            }
            Input::Text(text) => match conversation.turn(&text).await {
                Ok(reply) => display_assistant_reply(&reply),
                Err(e) => display_turn_failure(&e.to_string()),
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_input() {
        assert_eq!(classify_input("  QUIT "), Input::Quit);
        assert_eq!(classify_input("Exit"), Input::Quit);
        assert_eq!(classify_input("   "), Input::Empty);
        assert_eq!(
            classify_input("top keywords for amazon.com\n"),
            Input::Text("top keywords for amazon.com".to_string())
        );
    }
}
