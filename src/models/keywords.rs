use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeywordEntry {
    pub keyword: String,
    pub estimated_volume: u64,
}
