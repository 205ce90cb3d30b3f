use super::models::ApiErrorBody;
use crate::models::{Message, Role};

pub const NO_ASSISTANT_RESPONSE: &str = "No assistant response found.";

/// Text of the newest assistant message in a newest-first listing.
pub fn latest_assistant_reply(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .find_map(|m| m.text())
}

/// Pull the human-readable message out of an error response body.
pub fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
