//! Retry with backoff for transient Google API failures.
//!
//! Rate limiting (429), request timeouts (408), server errors (5xx) and
//! connect/timeout transport failures are retried. Everything else, 403 in
//! particular, is returned as is on the first attempt.

use std::time::Duration;

use tracing::warn;

/// Longest `Retry-After` we are willing to honour.
const MAX_RETRY_AFTER_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 250,
            max_backoff_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// A single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryDecision {
    Retryable,
    NonRetryable,
}

pub(crate) fn retry_decision_for_status(status: reqwest::StatusCode) -> RetryDecision {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
    {
        RetryDecision::Retryable
    } else {
        RetryDecision::NonRetryable
    }
}

fn backoff(attempt: u32, policy: &RetryPolicy) -> u64 {
    let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
    policy
        .initial_backoff_ms
        .saturating_mul(exponent)
        .min(policy.max_backoff_ms)
}

pub(crate) fn retry_delay(
    attempt: u32,
    policy: &RetryPolicy,
    retry_after: Option<&str>,
) -> Duration {
    if let Some(secs) = retry_after.and_then(|v| v.trim().parse::<u64>().ok()) {
        return Duration::from_secs(secs.min(MAX_RETRY_AFTER_SECS));
    }

    let jitter = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0))
        % 150;
    Duration::from_millis(backoff(attempt, policy).saturating_add(jitter))
}

/// Send `request`, retrying transient failures per `policy`.
///
/// Requests whose body cannot be cloned are sent exactly once.
pub(crate) async fn send_with_retry(
    request: reqwest::RequestBuilder,
    policy: &RetryPolicy,
) -> Result<reqwest::Response, reqwest::Error> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let Some(cloned) = request.try_clone() else {
            return request.send().await;
        };

        match cloned.send().await {
            Ok(response) => {
                let status = response.status();
                if retry_decision_for_status(status) == RetryDecision::Retryable
                    && attempt < attempts
                {
                    let retry_after = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok());
                    let delay = retry_delay(attempt, policy, retry_after);
                    warn!(
                        attempt,
                        attempts,
                        %status,
                        ?delay,
                        "Retrying Google API request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Ok(response);
            }
            Err(err) => {
                if (err.is_timeout() || err.is_connect()) && attempt < attempts {
                    let delay = retry_delay(attempt, policy, None);
                    warn!(
                        attempt,
                        attempts,
                        error = %err,
                        ?delay,
                        "Retrying Google API request after transport error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_transient_statuses_are_retryable() {
        for status in [
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert_eq!(retry_decision_for_status(status), RetryDecision::Retryable);
        }
    }

    #[test]
    fn test_forbidden_and_client_errors_are_not_retried() {
        for status in [
            StatusCode::FORBIDDEN,
            StatusCode::UNAUTHORIZED,
            StatusCode::NOT_FOUND,
            StatusCode::GONE,
            StatusCode::OK,
        ] {
            assert_eq!(retry_decision_for_status(status), RetryDecision::NonRetryable);
        }
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(backoff(1, &policy), 250);
        assert_eq!(backoff(2, &policy), 500);
        assert_eq!(backoff(3, &policy), 1_000);
        assert_eq!(backoff(5, &policy), 2_000);
        assert_eq!(backoff(64, &policy), 2_000);
    }

    #[test]
    fn test_retry_after_is_honoured_and_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(retry_delay(1, &policy, Some("2")), Duration::from_secs(2));
        assert_eq!(retry_delay(1, &policy, Some("3600")), Duration::from_secs(30));
    }

    #[test]
    fn test_delay_without_retry_after_adds_bounded_jitter() {
        let policy = RetryPolicy::default();
        let delay = retry_delay(2, &policy, Some("not-a-number"));
        assert!(delay >= Duration::from_millis(500));
        assert!(delay < Duration::from_millis(650));
    }
}
