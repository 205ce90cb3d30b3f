pub const DEFAULT_ASSISTANTS_ENDPOINT: &str = "https://api.openai.com/v1";

pub const DEFAULT_KEYWORDS_ENDPOINT: &str =
    "https://api.similarweb.com/v4/shopper/category-top-keywords";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_ASSISTANT_NAME: &str = "Keyword Research Assistant";

pub const DEFAULT_ASSISTANT_INSTRUCTIONS: &str = "You are a market research assistant. \
When the user asks about search keywords for an e-commerce category or domain, call the \
get_similarweb_top_keywords tool and summarize the results. If the tool returns an error, \
explain it plainly.";

pub const DEFAULT_RUN_INSTRUCTIONS: &str =
    "Please use available tools if a user asks for keyword information. Address the user directly.";

pub fn default_request_timeout_secs() -> u64 {
    60
}

pub fn default_poll_interval_ms() -> u64 {
    1500
}

pub fn default_max_polls() -> u32 {
    120
}

pub fn default_max_retries() -> u32 {
    3
}

pub fn default_retry_delay_ms() -> u64 {
    1000
}
