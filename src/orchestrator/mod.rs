//! Drives one assistant run from creation to a terminal state.
//!
//! The remote service owns the run's state machine; this side only observes it
//! by polling, answers `requires_action` by executing local tools, and stops at
//! the first terminal status or when the poll budget is spent.

mod dispatch;
mod retry;

pub use dispatch::{dispatch_tool_calls, error_output};
pub use retry::{with_resend_retries, with_retries};

use crate::api::AssistantBackend;
use crate::config::RunSettings;
use crate::error::{KwAssistError, Result};
use crate::local_tools::ToolRegistry;
use crate::models::{RequiredAction, Run, RunStatus, ToolCall};
use crate::ui::log_verbose;
use std::collections::HashSet;

/// A run that reached `completed`.
#[derive(Debug)]
pub struct CompletedRun {
    pub run: Run,
    /// Status checks issued after creation.
    pub polls: u32,
    pub tool_outputs_submitted: usize,
}

pub struct RunController<'a> {
    backend: &'a dyn AssistantBackend,
    registry: &'a ToolRegistry,
    settings: RunSettings,
    verbose: bool,
}

impl<'a> RunController<'a> {
    pub fn new(
        backend: &'a dyn AssistantBackend,
        registry: &'a ToolRegistry,
        settings: RunSettings,
        verbose: bool,
    ) -> Self {
        Self {
            backend,
            registry,
            settings,
            verbose,
        }
    }

    /// Start a run on `thread_id` and wait for it to finish.
    pub async fn execute(
        &self,
        thread_id: &str,
        assistant_id: &str,
        instructions: Option<&str>,
    ) -> Result<CompletedRun> {
        let backend = self.backend;
        let run = with_resend_retries(&self.settings, "create run", self.verbose, || {
            backend.create_run(thread_id, assistant_id, instructions)
        })
        .await?;

        log_verbose(
            self.verbose,
            "run",
            format!("Run {} created on thread {}", run.id, thread_id),
        );
        self.drive(run).await
    }

    /// Poll an existing run until it is terminal, answering tool requests on the way.
    pub async fn drive(&self, initial: Run) -> Result<CompletedRun> {
        let backend = self.backend;
        let thread_id = initial.thread_id.clone();
        let run_id = initial.id.clone();
        let (thread_id, run_id) = (thread_id.as_str(), run_id.as_str());

        let mut run = initial;
        let mut polls: u32 = 0;
        let mut answered: HashSet<String> = HashSet::new();
        let mut submitted = 0;

        loop {
            log_verbose(self.verbose, "run", format!("Run status: {}", run.status));

            match run.status {
                RunStatus::Completed => {
                    return Ok(CompletedRun {
                        run,
                        polls,
                        tool_outputs_submitted: submitted,
                    });
                }
                status if status.is_terminal() => {
                    return Err(KwAssistError::RunFailed {
                        status,
                        reason: run.last_error.as_ref().and_then(|e| e.describe()),
                    });
                }
                RunStatus::RequiresAction => {
                    if matches!(run.required_action, Some(RequiredAction::Unsupported) | None) {
                        return Err(KwAssistError::RunFailed {
                            status: RunStatus::RequiresAction,
                            reason: Some("the run requested an unsupported action".to_string()),
                        });
                    }

                    let pending: Vec<ToolCall> = run
                        .pending_tool_calls()
                        .iter()
                        .filter(|call| !answered.contains(&call.id))
                        .cloned()
                        .collect();

                    if !pending.is_empty() {
                        let outputs =
                            dispatch_tool_calls(self.registry, &pending, self.verbose).await;
                        let outputs = outputs.as_slice();

                        run = with_retries(&self.settings, "submit tool outputs", self.verbose, || {
                            backend.submit_tool_outputs(thread_id, run_id, outputs)
                        })
                        .await?;

                        log_verbose(
                            self.verbose,
                            "run",
                            format!("Submitted {} tool output(s)", outputs.len()),
                        );
                        answered.extend(pending.into_iter().map(|call| call.id));
                        submitted += outputs.len();
                        continue;
                    }
                    // Everything was answered; the remote side has not caught up yet.
                }
                _ => {}
            }

            if polls >= self.settings.max_polls {
                return Err(KwAssistError::RunTimeout { polls });
            }

            tokio::time::sleep(self.settings.poll_interval).await;
            run = with_retries(&self.settings, "retrieve run", self.verbose, || {
                backend.retrieve_run(thread_id, run_id)
            })
            .await?;
            polls += 1;
        }
    }
}
