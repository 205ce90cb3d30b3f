use crate::models::RunStatus;
use std::fmt;

#[derive(Debug)]
pub enum KwAssistError {
    ApiError {
        status: u16,
        message: String,
    },
    ConfigError(String),
    NetworkError(reqwest::Error),
    RunFailed {
        status: RunStatus,
        reason: Option<String>,
    },
    RunTimeout {
        polls: u32,
    },
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl KwAssistError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            KwAssistError::NetworkError(_) => true,
            KwAssistError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the request certainly had no effect, so even a non-idempotent call may be sent again.
    pub fn is_safe_to_resend(&self) -> bool {
        match self {
            KwAssistError::NetworkError(e) => e.is_connect(),
            KwAssistError::ApiError { status, .. } => *status == 429,
            _ => false,
        }
    }
}

impl fmt::Display for KwAssistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KwAssistError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            KwAssistError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            KwAssistError::NetworkError(e) => write!(f, "Network error: {}", e),
            KwAssistError::RunFailed { status, reason } => match reason {
                Some(reason) => write!(f, "Run ended with status '{}': {}", status, reason),
                None => write!(f, "Run ended with status '{}'", status),
            },
            KwAssistError::RunTimeout { polls } => {
                write!(f, "Run did not finish after {} status checks", polls)
            }
            KwAssistError::IoError(e) => write!(f, "IO error: {}", e),
            KwAssistError::JsonError(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for KwAssistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KwAssistError::NetworkError(e) => Some(e),
            KwAssistError::IoError(e) => Some(e),
            KwAssistError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for KwAssistError {
    fn from(err: reqwest::Error) -> Self {
        KwAssistError::NetworkError(err)
    }
}

impl From<std::io::Error> for KwAssistError {
    fn from(err: std::io::Error) -> Self {
        KwAssistError::IoError(err)
    }
}

impl From<serde_json::Error> for KwAssistError {
    fn from(err: serde_json::Error) -> Self {
        KwAssistError::JsonError(err)
    }
}

pub type Result<T> = std::result::Result<T, KwAssistError>;
