use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone)]
pub struct Thread {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Message {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl Message {
    /// Text parts of the message joined by newlines, if any.
    pub fn text(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|c| match c {
                MessageContent::Text { text } => Some(text.value.as_str()),
                MessageContent::Unsupported => None,
            })
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TextContent {
    pub value: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MessageList {
    pub data: Vec<Message>,
}
