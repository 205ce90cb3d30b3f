use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,
    pub function: FunctionCall,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// Raw JSON text as produced by the model; not guaranteed to parse.
    #[serde(default)]
    pub arguments: String,
}

/// Result of one tool call, submitted back to resume a run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

fn default_tool_type() -> String {
    "function".to_string()
}
