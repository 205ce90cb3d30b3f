use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub assistants_endpoint: Option<String>,
    #[serde(default)]
    pub keywords_endpoint: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}
