//! The two timer slots owned by the controller.
//!
//! At most one phase timer and one countdown ticker exist at any instant.
//! Filling a slot cancels its previous occupant, and [`Timers::cancel_all`]
//! empties both before the controller yields again.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Stand-in deadline for delays too long to represent, roughly 30 years out.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `delay` from now, saturating at [`FAR_FUTURE`] instead of overflowing.
pub fn deadline_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Sent by a phase timer when it elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimerFired {
    pub generation: u64,
}

/// A spawned timer task. Dropping the handle aborts the task.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
    deadline: Instant,
}

impl TimerHandle {
    pub fn new(task: JoinHandle<()>, deadline: Instant) -> Self {
        Self { task, deadline }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_live(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Debug, Default)]
pub struct Timers {
    phase: Option<TimerHandle>,
    ticker: Option<TimerHandle>,
    /// Identifies the currently armed phase timer. Bumped on every arm and
    /// cancel so that a firing queued before a cancel is recognised as stale.
    generation: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the phase timer, replacing any pending one.
    pub fn arm_phase(&mut self, delay: Duration, events: &UnboundedSender<PhaseTimerFired>) {
        self.phase = None;
        self.generation += 1;

        let generation = self.generation;
        let deadline = deadline_after(delay);
        let events = events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = events.send(PhaseTimerFired { generation });
        });

        self.phase = Some(TimerHandle::new(task, deadline));
    }

    /// Consume a firing. Returns false for stale firings, which must be ignored.
    pub fn accept(&mut self, fired: PhaseTimerFired) -> bool {
        if fired.generation != self.generation || self.phase.is_none() {
            return false;
        }
        self.phase = None;
        true
    }

    pub fn cancel_phase(&mut self) {
        self.phase = None;
        self.generation += 1;
    }

    /// Install a countdown ticker, cancelling the previous one.
    pub fn set_ticker(&mut self, ticker: TimerHandle) {
        self.ticker = Some(ticker);
    }

    pub fn cancel_ticker(&mut self) {
        self.ticker = None;
    }

    /// Cancel both timers. Returns whether anything was live.
    pub fn cancel_all(&mut self) -> bool {
        let had_live = self.phase_live() || self.ticker_live();
        self.cancel_ticker();
        self.cancel_phase();
        had_live
    }

    pub fn phase_live(&self) -> bool {
        self.phase.as_ref().is_some_and(TimerHandle::is_live)
    }

    pub fn ticker_live(&self) -> bool {
        self.ticker.as_ref().is_some_and(TimerHandle::is_live)
    }

    pub fn phase_deadline(&self) -> Option<Instant> {
        self.phase.as_ref().map(TimerHandle::deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_phase_timer_fires_once_with_current_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new();

        timers.arm_phase(Duration::from_secs(3), &tx);
        assert!(timers.phase_live());

        let fired = rx.recv().await.unwrap();
        assert!(timers.accept(fired));
        assert!(!timers.phase_live());
        assert!(!timers.accept(fired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_cancels_previous_phase_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new();

        timers.arm_phase(Duration::from_secs(1), &tx);
        timers.arm_phase(Duration::from_secs(5), &tx);

        let start = Instant::now();
        let fired = rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(5));
        assert!(timers.accept(fired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_clears_both_slots() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new();

        timers.arm_phase(Duration::from_secs(2), &tx);
        let ticker = tokio::spawn(std::future::pending::<()>());
        timers.set_ticker(TimerHandle::new(ticker, Instant::now()));

        assert!(timers.cancel_all());
        assert!(!timers.phase_live());
        assert!(!timers.ticker_live());
        assert!(!timers.cancel_all());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_delay_saturates() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new();

        timers.arm_phase(Duration::MAX, &tx);
        assert!(timers.phase_live());
        assert!(timers.phase_deadline().unwrap() > Instant::now() + Duration::from_secs(86_400 * 365));

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(rx.try_recv().is_err());
        assert!(timers.phase_live());
    }

    #[test]
    fn test_deadline_after_is_exact_for_small_delays() {
        let before = Instant::now();
        let deadline = deadline_after(Duration::from_secs(5));
        assert!(deadline >= before + Duration::from_secs(5));
        assert!(deadline <= Instant::now() + Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_firing_queued_before_cancel_is_stale() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new();

        timers.arm_phase(Duration::from_secs(1), &tx);
        let fired = rx.recv().await.unwrap();
        timers.cancel_phase();

        assert!(!timers.accept(fired));
    }
}
