//! Retry wrapper for transient provider failures.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{instrument, warn};

use crate::error::ProviderError;
use crate::provider::{GenerateRequest, GenerateResponse, LlmProvider, ModelInfo};

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Wraps a provider and retries transient failures with exponential backoff.
///
/// Permanent errors (bad credentials, unknown model, unsupported input) are
/// returned immediately. A rate-limit `retry-after` hint replaces the current
/// backoff delay.
pub struct RetryingProvider {
    inner: Box<dyn LlmProvider>,
    max_retries: u32,
    retry_delay: Duration,
}

impl RetryingProvider {
    pub fn new(inner: Box<dyn LlmProvider>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            retry_delay,
        }
    }
}

#[async_trait]
impl LlmProvider for RetryingProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    #[instrument(skip(self, request), fields(provider = %self.inner.name(), model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let mut delay = self.retry_delay;
        let mut attempt = 0;
        loop {
            let err = match self.inner.generate(request).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            let provider_err = err.downcast_ref::<ProviderError>();
            if provider_err.is_some_and(ProviderError::is_permanent) || attempt >= self.max_retries
            {
                return Err(err);
            }
            if let Some(ms) = provider_err.and_then(ProviderError::retry_after_ms) {
                delay = Duration::from_millis(ms);
            }

            attempt += 1;
            warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying provider request");
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(MAX_BACKOFF);
        }
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        self.inner.available_models()
    }
}
