//! Keyword-ranking lookups: query normalization, the source abstraction, and
//! the failure taxonomy reported back to the model.

mod similarweb;

pub use similarweb::{interpret_response, SimilarWebClient};

use crate::models::KeywordEntry;
use chrono::{Datelike, NaiveDate};
use futures::future::BoxFuture;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_COUNTRY: &str = "us";

/// Anything that can answer a top-keywords query.
pub trait KeywordSource: Send + Sync {
    fn top_keywords<'a>(
        &'a self,
        query: &'a KeywordQuery,
    ) -> BoxFuture<'a, Result<Vec<KeywordEntry>, LookupError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "daily" => Some(Granularity::Daily),
            "weekly" => Some(Granularity::Weekly),
            "monthly" => Some(Granularity::Monthly),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordQuery {
    pub category: String,
    pub domain: String,
    /// Inclusive, `YYYY-MM`.
    pub start_date: String,
    /// Inclusive, `YYYY-MM`.
    pub end_date: String,
    pub country: String,
    pub granularity: Granularity,
    pub limit: u32,
}

impl KeywordQuery {
    /// Build a query from tool arguments, filling defaults relative to `today`.
    pub fn from_arguments(args: &Value, today: NaiveDate) -> Result<Self, LookupError> {
        let category = match args.get("category") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(LookupError::InvalidArguments(
                "category is required (a category id such as -1, or a category path)".to_string(),
            )),
        };

        let domain = args
            .get("domain")
            .and_then(|v| v.as_str())
            .map(normalize_domain)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| {
                LookupError::InvalidArguments("domain is required (e.g. amazon.com)".to_string())
            })?;

        let period = optional_month(args, "period")?;
        let start = optional_month(args, "start_date")?.or_else(|| period.clone());
        let end = optional_month(args, "end_date")?.or_else(|| period.clone());
        let (start_date, end_date) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start.clone(), start),
            (None, Some(end)) => (end.clone(), end),
            (None, None) => {
                let last = last_complete_month(today);
                (last.clone(), last)
            }
        };
        if start_date > end_date {
            return Err(LookupError::InvalidArguments(format!(
                "start_date {} is after end_date {}",
                start_date, end_date
            )));
        }

        let country = args
            .get("country")
            .and_then(|v| v.as_str())
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        let granularity = match args.get("granularity").and_then(|v| v.as_str()) {
            Some(raw) => Granularity::parse(raw).ok_or_else(|| {
                LookupError::InvalidArguments(format!(
                    "granularity must be Daily, Weekly or Monthly, got '{}'",
                    raw
                ))
            })?,
            None => Granularity::Monthly,
        };

        let limit = args
            .get("limit")
            .and_then(|v| v.as_i64())
            .map(|l| l.clamp(1, MAX_LIMIT as i64) as u32)
            .unwrap_or(DEFAULT_LIMIT);

        Ok(Self {
            category,
            domain,
            start_date,
            end_date,
            country,
            granularity,
            limit,
        })
    }

    /// Query-string pairs sent upstream. The API key travels in a header.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("category", self.category.clone()),
            ("domain", self.domain.clone()),
            ("start_date", self.start_date.clone()),
            ("end_date", self.end_date.clone()),
            ("country", self.country.clone()),
            ("granularity", self.granularity.as_str().to_string()),
            ("limit", self.limit.to_string()),
            ("format", "json".to_string()),
        ]
    }
}

/// Why a lookup produced no keywords. `Display` is the text handed to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    InvalidArguments(String),
    Unauthorized(Option<String>),
    InvalidParameters(String),
    RateLimited,
    NoResults,
    Upstream { status: u16 },
    UnexpectedStatus { status: u16, detail: String },
    InvalidResponse(String),
    Transport(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::InvalidArguments(msg) => write!(f, "Invalid tool arguments: {}", msg),
            LookupError::Unauthorized(detail) => {
                write!(
                    f,
                    "Authentication with the SimilarWeb API failed; the configured API key was rejected"
                )?;
                if let Some(detail) = detail {
                    write!(f, " ({})", detail)?;
                }
                Ok(())
            }
            LookupError::InvalidParameters(detail) => write!(
                f,
                "The SimilarWeb API rejected the request parameters: {}",
                detail
            ),
            LookupError::RateLimited => write!(
                f,
                "The SimilarWeb API rate limit was reached; try again in a little while"
            ),
            LookupError::NoResults => write!(
                f,
                "The SimilarWeb API returned no keyword data for this category, domain and period"
            ),
            LookupError::Upstream { status } => write!(
                f,
                "The SimilarWeb API is currently unavailable (HTTP {})",
                status
            ),
            LookupError::UnexpectedStatus { status, detail } => write!(
                f,
                "The SimilarWeb API answered with unexpected HTTP {}: {}",
                status, detail
            ),
            LookupError::InvalidResponse(msg) => write!(
                f,
                "The SimilarWeb API returned a response that could not be read: {}",
                msg
            ),
            LookupError::Transport(msg) => write!(f, "Could not reach the SimilarWeb API: {}", msg),
        }
    }
}

impl LookupError {
    /// Failures where asking again later may give a different answer.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LookupError::Transport(_) | LookupError::RateLimited | LookupError::Upstream { .. }
        )
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Transport("request timed out".to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// The month before `today`, as `YYYY-MM`.
pub fn last_complete_month(today: NaiveDate) -> String {
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    format!("{:04}-{:02}", year, month)
}

fn optional_month(args: &Value, field: &str) -> Result<Option<String>, LookupError> {
    let Some(raw) = args.get(field).and_then(|v| v.as_str()) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if is_month(raw) {
        Ok(Some(raw.to_string()))
    } else {
        Err(LookupError::InvalidArguments(format!(
            "{} must use the YYYY-MM format, got '{}'",
            field, raw
        )))
    }
}

static MONTH_PATTERN: OnceLock<Regex> = OnceLock::new();

fn is_month(value: &str) -> bool {
    MONTH_PATTERN
        .get_or_init(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap())
        .is_match(value)
}

fn normalize_domain(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let host = without_scheme.split('/').next().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
