//! Display countdown ticker.
//!
//! Remaining time is derived from a fixed deadline on every tick, so late or
//! skipped ticks never skew the numbers shown. The ticker has no say in when
//! the cycle advances; that is the phase timer's job.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::controller::timers::{TimerHandle, deadline_after};
use crate::gateway::MessagingGateway;
use crate::host::TargetHost;
use crate::protocol::TargetRequest;
use crate::target::Target;

const TICK: Duration = Duration::from_secs(1);

/// Whole seconds left until `deadline`, rounded up.
pub fn remaining_secs(deadline: Instant, now: Instant) -> u64 {
    let left = deadline.saturating_duration_since(now);
    let millis = left.as_millis();
    u64::try_from(millis.div_ceil(1000)).unwrap_or(u64::MAX)
}

/// Spawn a ticker pushing `updateTimer` to `target` once per second until
/// `duration` has elapsed. The first update goes out immediately.
pub fn spawn_countdown<H: TargetHost>(
    gateway: MessagingGateway<H>,
    target: Target,
    label: &'static str,
    duration: Duration,
) -> TimerHandle {
    let deadline = deadline_after(duration);

    let task = tokio::spawn(async move {
        let mut ticks = tokio::time::interval(TICK);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticks.tick().await;

            let remaining = remaining_secs(deadline, Instant::now());
            if remaining == 0 {
                break;
            }

            let update = TargetRequest::update_timer(label, remaining);
            if let Err(e) = gateway.send(Some(&target), &update).await {
                debug!(
                    event = "core.countdown.update_dropped",
                    context_id = %target.context_id,
                    label = label,
                    remaining = remaining,
                    error = %e,
                );
            }
        }
    });

    TimerHandle::new(task, deadline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_rounds_up() {
        let now = Instant::now();
        assert_eq!(remaining_secs(now + Duration::from_secs(5), now), 5);
        assert_eq!(remaining_secs(now + Duration::from_millis(4001), now), 5);
        assert_eq!(remaining_secs(now + Duration::from_millis(999), now), 1);
        assert_eq!(remaining_secs(now, now), 0);
    }

    #[test]
    fn test_remaining_saturates_past_deadline() {
        let now = Instant::now();
        let deadline = now;
        assert_eq!(remaining_secs(deadline, now + Duration::from_secs(3)), 0);
    }
}
