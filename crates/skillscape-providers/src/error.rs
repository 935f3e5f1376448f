//! Provider error types.
//!
//! Callers receive these wrapped in `anyhow::Error`; the retry layer
//! downcasts them to decide whether another attempt makes sense.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The provider cannot handle this kind of input (e.g. PDF documents).
    #[error("unsupported by {provider}: {what}")]
    Unsupported { provider: String, what: String },
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        match self {
            ProviderError::AuthenticationFailed(_)
            | ProviderError::ModelNotFound(_)
            | ProviderError::Unsupported { .. } => true,
            ProviderError::ApiError { status, .. } => {
                // Client errors other than 408/429 will fail the same way again.
                (400..500).contains(status) && *status != 408 && *status != 429
            }
            _ => false,
        }
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

/// Map non-success HTTP responses onto [`ProviderError`].
///
/// `extract_message` pulls a human-readable message out of the provider's
/// error body; the raw body is used when it returns `None`.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
    extract_message: fn(&str) -> Option<String>,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            * 1000;
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body).unwrap_or(body);
    Err(match status {
        401 | 403 => ProviderError::AuthenticationFailed(message),
        404 => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::ApiError { status, message },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence() {
        assert!(ProviderError::AuthenticationFailed("x".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("m".into()).is_permanent());
        assert!(ProviderError::ApiError {
            status: 400,
            message: "bad".into()
        }
        .is_permanent());
        assert!(!ProviderError::ApiError {
            status: 503,
            message: "busy".into()
        }
        .is_permanent());
        assert!(!ProviderError::RateLimited {
            retry_after_ms: 10
        }
        .is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
    }

    #[test]
    fn retry_after_hint() {
        let err = ProviderError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.retry_after_ms(), Some(5000));
        assert_eq!(err.to_string(), "rate limited, retry after 5000ms");
        assert_eq!(ProviderError::Timeout(1).retry_after_ms(), None);
    }
}
