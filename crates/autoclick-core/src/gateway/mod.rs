//! Bounded-retry delivery of requests to the target context.

pub mod errors;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

pub use errors::GatewayError;

use crate::host::{HostError, TargetHost};
use crate::protocol::{TargetRequest, TargetResponse};
use crate::target::Target;

/// How hard the gateway tries before giving up on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Fixed pause between two attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Wraps the host's single-shot delivery with bounded retry.
pub struct MessagingGateway<H> {
    host: Arc<H>,
    policy: RetryPolicy,
}

impl<H> Clone for MessagingGateway<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            policy: self.policy,
        }
    }
}

impl<H: TargetHost> MessagingGateway<H> {
    pub fn new(host: Arc<H>, policy: RetryPolicy) -> Self {
        Self { host, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Deliver `request` to `target`.
    ///
    /// Returns `Ok(None)` without touching the channel when no target is
    /// configured. Otherwise retries up to `max_attempts` times with a fixed
    /// backoff and returns the last error once attempts are exhausted.
    pub async fn send(
        &self,
        target: Option<&Target>,
        request: &TargetRequest,
    ) -> Result<Option<TargetResponse>, GatewayError> {
        let Some(target) = target else {
            return Ok(None);
        };

        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<HostError> = None;

        for attempt in 1..=max_attempts {
            match self.host.deliver(&target.context_id, request).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(
                            event = "core.gateway.delivered_after_retry",
                            context_id = %target.context_id,
                            action = request.action(),
                            attempt = attempt,
                        );
                    }
                    return Ok(Some(response));
                }
                Err(e) => {
                    if e.is_transient() {
                        debug!(
                            event = "core.gateway.attempt_failed",
                            context_id = %target.context_id,
                            action = request.action(),
                            attempt = attempt,
                            error = %e,
                        );
                    } else {
                        warn!(
                            event = "core.gateway.attempt_failed",
                            context_id = %target.context_id,
                            action = request.action(),
                            attempt = attempt,
                            error = %e,
                        );
                    }
                    last_error = Some(e);

                    if attempt < max_attempts {
                        tokio::time::sleep(self.policy.backoff).await;
                    }
                }
            }
        }

        Err(GatewayError::DeliveryFailed {
            context: target.context_id.to_string(),
            attempts: max_attempts,
            source: last_error.unwrap_or(HostError::ChannelClosed),
        })
    }
}
