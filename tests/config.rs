use kwassist::config::{Config, Credentials, JsonConfig, DEFAULT_MODEL};
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn test_defaults_without_file_or_env() {
    let config = Config::resolve(&JsonConfig::default(), env_of(&[]));

    assert_eq!(config.assistants_endpoint, "https://api.openai.com/v1");
    assert_eq!(config.assistant.model, DEFAULT_MODEL);
    assert_eq!(config.assistant.id, None);
    assert_eq!(config.run.poll_interval, Duration::from_millis(1500));
    assert_eq!(config.run.max_polls, 120);
    assert_eq!(config.request_timeout, Duration::from_secs(60));
    assert!(!config.verbose);
}

#[test]
fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".kwassist.yaml");
    fs::write(
        &path,
        r#"
api:
  assistants_endpoint: "https://${PROXY_HOST}/v1/"
  request_timeout_secs: 15
assistant:
  id: asst_from_file
  model: gpt-4o
run:
  poll_interval_ms: 250
  max_polls: 40
session:
  verbose: true
"#,
    )
    .unwrap();

    let file = JsonConfig::load_from(&path).unwrap();
    let config = Config::resolve(&file, env_of(&[("PROXY_HOST", "proxy.internal")]));

    assert_eq!(config.assistants_endpoint, "https://proxy.internal/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(15));
    assert_eq!(config.assistant.id.as_deref(), Some("asst_from_file"));
    assert_eq!(config.assistant.model, "gpt-4o");
    assert_eq!(config.run.poll_interval, Duration::from_millis(250));
    assert_eq!(config.run.max_polls, 40);
    assert!(config.verbose);
}

#[test]
fn test_environment_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kwassist.json");
    fs::write(
        &path,
        r#"{"assistant": {"id": "asst_file", "model": "gpt-4o"}, "run": {"max_polls": 40}, "session": {"verbose": true}}"#,
    )
    .unwrap();

    let file = JsonConfig::load_from(&path).unwrap();
    let config = Config::resolve(
        &file,
        env_of(&[
            ("KWASSIST_ASSISTANT_ID", "asst_env"),
            ("KWASSIST_MAX_POLLS", "7"),
            ("KWASSIST_VERBOSE", "off"),
        ]),
    );

    assert_eq!(config.assistant.id.as_deref(), Some("asst_env"));
    assert_eq!(config.assistant.model, "gpt-4o");
    assert_eq!(config.run.max_polls, 7);
    assert!(!config.verbose);
}

#[test]
fn test_malformed_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = JsonConfig::load_from(&path).unwrap_err();

    assert!(format!("{:#}", err).contains("broken.json"));
}

#[test]
fn test_missing_secret_is_reported_by_name() {
    let err = Credentials::from_lookup(env_of(&[("OPENAI_API_KEY", "sk-test")])).unwrap_err();
    assert!(err.contains("SIMILARWEB_API_KEY"));

    let err = Credentials::from_lookup(env_of(&[
        ("OPENAI_API_KEY", "   "),
        ("SIMILARWEB_API_KEY", "sw-test"),
    ]))
    .unwrap_err();
    assert!(err.contains("OPENAI_API_KEY"));
}

#[test]
fn test_credentials_are_redacted_in_debug() {
    let credentials = Credentials::from_lookup(env_of(&[
        ("OPENAI_API_KEY", "sk-secret"),
        ("SIMILARWEB_API_KEY", "sw-secret"),
    ]))
    .unwrap();

    let debug = format!("{:?}", credentials);
    assert!(!debug.contains("sk-secret"));
    assert!(!debug.contains("sw-secret"));
    assert_eq!(credentials.similarweb_api_key, "sw-secret");
}
