use crate::models::{Role, ToolOutput};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize, Clone)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Serialize)]
pub struct CreateAssistantRequest<'a> {
    pub model: &'a str,
    pub name: &'a str,
    pub instructions: &'a str,
    pub tools: &'a [Value],
}

#[derive(Serialize)]
pub struct UpdateAssistantRequest<'a> {
    pub tools: &'a [Value],
}

#[derive(Serialize)]
pub struct CreateMessageRequest<'a> {
    pub role: Role,
    pub content: &'a str,
}

#[derive(Serialize)]
pub struct CreateRunRequest<'a> {
    pub assistant_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'a str>,
}

#[derive(Serialize)]
pub struct SubmitToolOutputsRequest<'a> {
    pub tool_outputs: &'a [ToolOutput],
}

#[derive(Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}
