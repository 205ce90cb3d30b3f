use serde::{Deserialize, Serialize};
use std::fmt;

use super::tool::ToolCall;

#[derive(Debug, Deserialize, Clone)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
    #[serde(default)]
    pub last_error: Option<RunLastError>,
}

impl Run {
    /// Tool calls the remote side is waiting on, empty unless `requires_action`.
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        match &self.required_action {
            Some(RequiredAction::SubmitToolOutputs { submit_tool_outputs }) => {
                &submit_tool_outputs.tool_calls
            }
            _ => &[],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed
                | RunStatus::Failed
                | RunStatus::Cancelled
                | RunStatus::Expired
                | RunStatus::Incomplete
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequiredAction {
    SubmitToolOutputs {
        submit_tool_outputs: SubmitToolOutputs,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunLastError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RunLastError {
    pub fn describe(&self) -> Option<String> {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => Some(format!("{} ({})", message, code)),
            (None, Some(message)) => Some(message.clone()),
            (Some(code), None) => Some(code.clone()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_requires_action_run() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_1",
            "object": "thread.run",
            "thread_id": "thread_1",
            "status": "requires_action",
            "required_action": {
                "type": "submit_tool_outputs",
                "submit_tool_outputs": {
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "get_similarweb_top_keywords",
                            "arguments": "{\"category\": -1}"
                        }
                    }]
                }
            },
            "last_error": null
        }))
        .unwrap();

        assert_eq!(run.status, RunStatus::RequiresAction);
        assert_eq!(run.pending_tool_calls().len(), 1);
        assert_eq!(run.pending_tool_calls()[0].id, "call_1");
    }

    #[test]
    fn test_unknown_status_is_not_terminal() {
        let run: Run = serde_json::from_value(json!({
            "id": "run_1",
            "thread_id": "thread_1",
            "status": "some_future_state"
        }))
        .unwrap();

        assert_eq!(run.status, RunStatus::Unknown);
        assert!(!run.status.is_terminal());
        assert!(run.pending_tool_calls().is_empty());
    }

    #[test]
    fn test_last_error_description() {
        let err = RunLastError {
            code: Some("server_error".to_string()),
            message: Some("Something went wrong".to_string()),
        };
        assert_eq!(
            err.describe().as_deref(),
            Some("Something went wrong (server_error)")
        );
    }
}
