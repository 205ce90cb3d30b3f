use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults::{
    default_max_polls, default_max_retries, default_poll_interval_ms, default_retry_delay_ms,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunConfig {
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    #[serde(default)]
    pub max_polls: Option<u32>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub retry_delay_ms: Option<u64>,
}

/// Polling and retry bounds for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub poll_interval: Duration,
    /// Status checks allowed before the run is reported as timed out.
    pub max_polls: u32,
    /// Extra attempts after the first failed request, transient errors only.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(default_poll_interval_ms()),
            max_polls: default_max_polls(),
            max_retries: default_max_retries(),
            retry_delay: Duration::from_millis(default_retry_delay_ms()),
        }
    }
}
