use crate::config::RunSettings;
use crate::error::{KwAssistError, Result};
use crate::ui::log_verbose;
use std::future::Future;

/// Run an idempotent `op`, retrying transient failures up to `settings.max_retries` extra times.
pub async fn with_retries<T, F, Fut>(
    settings: &RunSettings,
    label: &str,
    verbose: bool,
    op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry_while(settings, label, verbose, KwAssistError::is_transient, op).await
}

/// Like [`with_retries`] for calls that create something remotely.
///
/// Only failures where the request was never acted on are retried, so a
/// message or run is not created twice.
pub async fn with_resend_retries<T, F, Fut>(
    settings: &RunSettings,
    label: &str,
    verbose: bool,
    op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry_while(settings, label, verbose, KwAssistError::is_safe_to_resend, op).await
}

async fn retry_while<T, F, Fut>(
    settings: &RunSettings,
    label: &str,
    verbose: bool,
    should_retry: fn(&KwAssistError) -> bool,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if should_retry(&err) && attempt < settings.max_retries => {
                attempt += 1;
                log_verbose(
                    verbose,
                    "run",
                    format!(
                        "{} failed ({}), retry {}/{}",
                        label, err, attempt, settings.max_retries
                    ),
                );
                tokio::time::sleep(settings.retry_delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
