mod api;
mod assistant;
mod defaults;
mod run;
mod validation;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::ApiConfig;
pub use assistant::{AssistantConfig, AssistantSettings};
pub use defaults::{DEFAULT_ASSISTANTS_ENDPOINT, DEFAULT_KEYWORDS_ENDPOINT, DEFAULT_MODEL};
pub use run::{RunConfig, RunSettings};
pub use validation::{expand_env_var_in_string, parse_flag};

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const SIMILARWEB_API_KEY_VAR: &str = "SIMILARWEB_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// The two secrets the process cannot start without.
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub similarweb_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("{} environment variable not set", name))
        };

        Ok(Self {
            openai_api_key: require(OPENAI_API_KEY_VAR)?,
            similarweb_api_key: require(SIMILARWEB_API_KEY_VAR)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("similarweb_api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub assistants_endpoint: String,
    pub keywords_endpoint: String,
    pub request_timeout: Duration,
    pub assistant: AssistantSettings,
    pub run: RunSettings,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let json_config = JsonConfig::load()?;
        Ok(Self::resolve(&json_config, |name| env::var(name).ok()))
    }

    /// Merge sources with precedence: environment > config file > defaults.
    pub fn resolve<F>(json_config: &JsonConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let expand = |value: String| expand_env_var_in_string(&value, &lookup);

        let assistants_endpoint = lookup("KWASSIST_ASSISTANTS_ENDPOINT")
            .or(json_config.api.assistants_endpoint.clone())
            .map(expand)
            .unwrap_or_else(|| DEFAULT_ASSISTANTS_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let keywords_endpoint = lookup("KWASSIST_KEYWORDS_ENDPOINT")
            .or(json_config.api.keywords_endpoint.clone())
            .map(expand)
            .unwrap_or_else(|| DEFAULT_KEYWORDS_ENDPOINT.to_string());

        let request_timeout = Duration::from_secs(
            json_config
                .api
                .request_timeout_secs
                .unwrap_or_else(defaults::default_request_timeout_secs),
        );

        let assistant = AssistantSettings {
            id: lookup("KWASSIST_ASSISTANT_ID")
                .or(json_config.assistant.id.clone())
                .filter(|id| !id.trim().is_empty()),
            model: lookup("KWASSIST_MODEL")
                .or(json_config.assistant.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            name: json_config
                .assistant
                .name
                .clone()
                .unwrap_or_else(|| defaults::DEFAULT_ASSISTANT_NAME.to_string()),
            instructions: json_config
                .assistant
                .instructions
                .clone()
                .unwrap_or_else(|| defaults::DEFAULT_ASSISTANT_INSTRUCTIONS.to_string()),
            run_instructions: json_config
                .assistant
                .run_instructions
                .clone()
                .unwrap_or_else(|| defaults::DEFAULT_RUN_INSTRUCTIONS.to_string()),
        };

        let run = RunSettings {
            poll_interval: Duration::from_millis(
                lookup("KWASSIST_POLL_INTERVAL_MS")
                    .and_then(|v| v.parse::<u64>().ok())
                    .or(json_config.run.poll_interval_ms)
                    .unwrap_or_else(defaults::default_poll_interval_ms),
            ),
            max_polls: lookup("KWASSIST_MAX_POLLS")
                .and_then(|v| v.parse::<u32>().ok())
                .or(json_config.run.max_polls)
                .unwrap_or_else(defaults::default_max_polls)
                .max(1),
            max_retries: json_config
                .run
                .max_retries
                .unwrap_or_else(defaults::default_max_retries),
            retry_delay: Duration::from_millis(
                json_config
                    .run
                    .retry_delay_ms
                    .unwrap_or_else(defaults::default_retry_delay_ms),
            ),
        };

        let verbose = lookup("KWASSIST_VERBOSE")
            .and_then(|v| parse_flag(&v))
            .or(json_config.session.verbose)
            .unwrap_or(false);

        Config {
            assistants_endpoint,
            keywords_endpoint,
            request_timeout,
            assistant,
            run,
            verbose,
        }
    }
}

impl JsonConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(JsonConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        let config = if matches!(extension, Some("yaml") | Some("yml")) {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".kwassist.yaml"),
            PathBuf::from(".kwassist.yml"),
            PathBuf::from(".kwassist.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("kwassist");
            paths.push(config_dir.join("kwassist.yaml"));
            paths.push(config_dir.join("kwassist.yml"));
            paths.push(config_dir.join("kwassist.json"));
        }

        paths
    }
}
