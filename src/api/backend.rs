use super::models::Assistant;
use crate::error::Result;
use crate::models::{Message, Run, Thread, ToolOutput};
use futures::future::BoxFuture;
use serde_json::Value;

/// Remote operations the conversation loop and run controller depend on.
pub trait AssistantBackend: Send + Sync {
    fn create_assistant<'a>(
        &'a self,
        model: &'a str,
        name: &'a str,
        instructions: &'a str,
        tools: &'a [Value],
    ) -> BoxFuture<'a, Result<Assistant>>;

    fn update_assistant_tools<'a>(
        &'a self,
        assistant_id: &'a str,
        tools: &'a [Value],
    ) -> BoxFuture<'a, Result<Assistant>>;

    fn create_thread(&self) -> BoxFuture<'_, Result<Thread>>;

    fn add_message<'a>(&'a self, thread_id: &'a str, content: &'a str)
        -> BoxFuture<'a, Result<Message>>;

    fn create_run<'a>(
        &'a self,
        thread_id: &'a str,
        assistant_id: &'a str,
        instructions: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Run>>;

    fn retrieve_run<'a>(&'a self, thread_id: &'a str, run_id: &'a str)
        -> BoxFuture<'a, Result<Run>>;

    fn submit_tool_outputs<'a>(
        &'a self,
        thread_id: &'a str,
        run_id: &'a str,
        outputs: &'a [ToolOutput],
    ) -> BoxFuture<'a, Result<Run>>;

    /// Newest messages first.
    fn list_messages<'a>(&'a self, thread_id: &'a str, limit: u32)
        -> BoxFuture<'a, Result<Vec<Message>>>;
}
