use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub run_instructions: Option<String>,
}

/// Which assistant to talk to, and how to create one if none is configured.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub id: Option<String>,
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub run_instructions: String,
}
