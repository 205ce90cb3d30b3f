use regex::Regex;
use std::sync::OnceLock;

static ENV_VAR_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Expand `${VAR_NAME}` references using `lookup`; unknown variables are left as written.
pub fn expand_env_var_in_string<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let re = ENV_VAR_PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

    re.replace_all(value, |caps: &regex::Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Parse a boolean-ish environment value.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
