use super::{KeywordQuery, KeywordSource, LookupError};
use crate::error::{KwAssistError, Result};
use crate::models::KeywordEntry;
use crate::ui::{log_verbose, preview};
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;

const KEYWORD_FIELDS: [&str; 3] = ["keyword", "search_term", "term"];
const VOLUME_FIELDS: [&str; 5] = [
    "estimated_volume",
    "volume",
    "search_volume",
    "visits",
    "traffic",
];

pub struct SimilarWebClient {
    http: reqwest::Client,
    endpoint: String,
    max_retries: u32,
    retry_delay: Duration,
    verbose: bool,
}

impl SimilarWebClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration, verbose: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| KwAssistError::ConfigError(format!("Invalid SimilarWeb API key: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            max_retries: 0,
            retry_delay: Duration::ZERO,
            verbose,
        })
    }

    /// Retry transient lookup failures up to `max_retries` extra times.
    pub fn with_retry_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Issue the request and return the raw status and body.
    pub async fn fetch_raw(&self, query: &KeywordQuery) -> std::result::Result<(u16, String), LookupError> {
        let pairs = query.query_pairs();
        log_verbose(
            self.verbose,
            "tools",
            format!("GET {} {:?}", self.endpoint, pairs),
        );

        let response = self.http.get(&self.endpoint).query(&pairs).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        log_verbose(
            self.verbose,
            "tools",
            format!("SimilarWeb responded {}: {}", status, preview(&body)),
        );
        Ok((status, body))
    }
}

impl KeywordSource for SimilarWebClient {
    fn top_keywords<'a>(
        &'a self,
        query: &'a KeywordQuery,
    ) -> BoxFuture<'a, std::result::Result<Vec<KeywordEntry>, LookupError>> {
        async move {
            let mut attempt = 0;
            loop {
                let result = match self.fetch_raw(query).await {
                    Ok((status, body)) => interpret_response(status, &body, query.limit as usize),
                    Err(err) => Err(err),
                };

                match result {
                    Err(err) if err.is_transient() && attempt < self.max_retries => {
                        attempt += 1;
                        log_verbose(
                            self.verbose,
                            "tools",
                            format!("Lookup failed ({}), retry {}/{}", err, attempt, self.max_retries),
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                    other => return other,
                }
            }
        }
        .boxed()
    }
}

/// Map an HTTP status and body from the ranking API onto keywords or a lookup error.
///
/// Entries keep upstream order and are cut at `limit`.
pub fn interpret_response(
    status: u16,
    body: &str,
    limit: usize,
) -> std::result::Result<Vec<KeywordEntry>, LookupError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    match status {
        200..=299 => {}
        401 | 403 => return Err(LookupError::Unauthorized(error_detail(parsed.as_ref()))),
        429 => return Err(LookupError::RateLimited),
        400 | 404 | 422 => {
            return Err(LookupError::InvalidParameters(
                error_detail(parsed.as_ref()).unwrap_or_else(|| preview(body.trim())),
            ))
        }
        500..=599 => return Err(LookupError::Upstream { status }),
        _ => {
            return Err(LookupError::UnexpectedStatus {
                status,
                detail: error_detail(parsed.as_ref()).unwrap_or_else(|| preview(body.trim())),
            })
        }
    }

    let Some(json) = parsed else {
        return Err(LookupError::InvalidResponse(format!(
            "expected JSON, got: {}",
            preview(body.trim())
        )));
    };

    // Some failures arrive as 200 with an error envelope.
    let meta_status = json
        .pointer("/meta/status")
        .and_then(|s| s.as_str())
        .unwrap_or_default();
    if meta_status.eq_ignore_ascii_case("error") {
        let detail = error_detail(Some(&json)).unwrap_or_else(|| "unknown error".to_string());
        return Err(match json.pointer("/meta/error_code").and_then(|c| c.as_u64()) {
            Some(401) | Some(403) => LookupError::Unauthorized(Some(detail)),
            Some(429) => LookupError::RateLimited,
            _ => LookupError::InvalidParameters(detail),
        });
    }

    let items = json
        .get("data")
        .or_else(|| json.get("top_keywords"))
        .or_else(|| json.get("keywords"))
        .or(if json.is_array() { Some(&json) } else { None })
        .and_then(|d| d.as_array());

    let entries: Vec<KeywordEntry> = items
        .map(|items| items.iter().filter_map(parse_entry).take(limit).collect())
        .unwrap_or_default();

    if entries.is_empty() {
        return Err(LookupError::NoResults);
    }
    Ok(entries)
}

fn parse_entry(item: &Value) -> Option<KeywordEntry> {
    let keyword = KEYWORD_FIELDS
        .iter()
        .find_map(|field| item.get(*field).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|k| !k.is_empty())?;

    let volume = VOLUME_FIELDS
        .iter()
        .find_map(|field| item.get(*field).and_then(|v| v.as_f64()))
        .unwrap_or(0.0);

    Some(KeywordEntry {
        keyword: keyword.to_string(),
        estimated_volume: volume.max(0.0).round() as u64,
    })
}

fn error_detail(json: Option<&Value>) -> Option<String> {
    let json = json?;
    [
        "/meta/error_message",
        "/error/message",
        "/error",
        "/message",
        "/detail",
    ]
    .iter()
    .find_map(|ptr| json.pointer(ptr).and_then(|v| v.as_str()))
    .map(|s| s.to_string())
}
