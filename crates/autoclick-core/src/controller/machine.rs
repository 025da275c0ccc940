//! The refresh/click cycle state machine.
//!
//! ```text
//! Idle ─start─▶ Reloading ─▶ AwaitingReady ─ready─▶ Waiting ─timer─▶ Clicking
//!                  ▲                │                                  │
//!                  │          (ready timeout)                          ▼
//!                  └────────────── timer ───────────────────────── Cooldown
//! ```
//!
//! Every transition is driven by one of three inputs: an operator command,
//! a readiness/closure notification from the host, or the phase timer.
//! Only target loss or an explicit stop leaves the loop; every other
//! failure is logged and the cycle is retried after the refresh interval.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::controller::countdown::{remaining_secs, spawn_countdown};
use crate::controller::errors::ControllerError;
use crate::controller::timers::{PhaseTimerFired, Timers};
use crate::controller::types::{ControllerOptions, CycleStatus, Phase, StopReport};
use crate::gateway::MessagingGateway;
use crate::host::TargetHost;
use crate::logging::diagnostic::clock_time;
use crate::logging::{ContextConsole, DiagnosticLogger, DiagnosticSink};
use crate::protocol::{LABEL_STOPPED, LABEL_UNTIL_CLICK, LABEL_UNTIL_REFRESH, TargetRequest};
use crate::settings::Settings;
use crate::target::{ContextId, Target, TargetTracker};

/// Mutable per-run state.
#[derive(Debug)]
pub struct CycleState {
    pub phase: Phase,
    /// Reload attempts since the last `start`.
    pub cycle_count: u64,
    pub timers: Timers,
}

impl Default for CycleState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            cycle_count: 0,
            timers: Timers::new(),
        }
    }
}

pub struct CycleController<H: TargetHost> {
    host: Arc<H>,
    gateway: MessagingGateway<H>,
    logger: DiagnosticLogger,
    tracker: TargetTracker,
    settings: Option<Settings>,
    state: CycleState,
    options: ControllerOptions,
    timer_events: UnboundedSender<PhaseTimerFired>,
}

impl<H: TargetHost> CycleController<H> {
    pub fn new(
        host: Arc<H>,
        options: ControllerOptions,
        local_sink: Arc<dyn DiagnosticSink>,
        timer_events: UnboundedSender<PhaseTimerFired>,
    ) -> Self {
        Self {
            gateway: MessagingGateway::new(Arc::clone(&host), options.retry),
            host,
            logger: DiagnosticLogger::new(local_sink),
            tracker: TargetTracker::new(),
            settings: None,
            state: CycleState::default(),
            options,
            timer_events,
        }
    }

    /// Start a new run against the currently active context.
    ///
    /// Any running cycle is stopped first. The first reload is issued before
    /// this returns.
    pub async fn start(&mut self, settings: Settings) -> Result<Target, ControllerError> {
        let target = self
            .host
            .active_context()
            .await?
            .ok_or(ControllerError::NoActiveContext)?;

        self.stop().await;

        self.tracker.configure(target.clone());
        self.logger.attach_target(Arc::new(ContextConsole::new(
            Arc::clone(&self.host),
            target.context_id.clone(),
        )));

        info!(
            event = "core.cycle.start_started",
            context_id = %target.context_id,
            url = target.origin_url,
            refresh_interval_secs = settings.refresh_interval_secs(),
            wait_secs = settings.wait_secs(),
            selector = settings.button_selector(),
        );

        self.logger.info(&format!(
            "Starting auto-refresh cycle for tab {} ({}) with settings: refreshInterval={}s, waitTime={}s, buttonSelector={}",
            target.context_id,
            target.origin_url,
            settings.refresh_interval_secs(),
            settings.wait_secs(),
            settings.button_selector(),
        ));

        self.settings = Some(settings);
        self.state.cycle_count = 0;
        self.begin_cycle().await;

        Ok(target)
    }

    /// Tear the run down. Safe to call when nothing is running.
    pub async fn stop(&mut self) -> StopReport {
        let was_running = self.state.phase.is_running();
        let cycles_completed = self.state.cycle_count;

        // Both timers go before the first await so no tick can race the teardown.
        self.state.timers.cancel_all();

        if was_running {
            self.logger.info(&format!(
                "Stopping refresh cycle after {} cycles",
                cycles_completed
            ));

            let update = TargetRequest::update_timer(LABEL_STOPPED, 0);
            if let Err(e) = self.gateway.send(self.tracker.current(), &update).await {
                debug!(event = "core.cycle.stop_update_failed", error = %e);
            }

            info!(
                event = "core.cycle.stop_completed",
                cycles_completed = cycles_completed
            );
        }

        self.state.phase = Phase::Idle;
        self.state.cycle_count = 0;
        self.settings = None;
        self.tracker.clear();
        self.logger.detach_target();

        StopReport {
            was_running,
            cycles_completed,
        }
    }

    pub fn status(&self) -> CycleStatus {
        let now = Instant::now();
        CycleStatus {
            phase: self.state.phase,
            cycle_count: self.state.cycle_count,
            target: self.tracker.current().cloned(),
            settings: self.settings.clone(),
            phase_timer_live: self.state.timers.phase_live(),
            ticker_live: self.state.timers.ticker_live(),
            next_transition_in_secs: self
                .state
                .timers
                .phase_deadline()
                .map(|deadline| remaining_secs(deadline, now)),
        }
    }

    /// The host reports that `context` finished loading.
    pub fn on_context_ready(&mut self, context: &ContextId) {
        let is_tracked = self
            .tracker
            .current()
            .is_some_and(|target| &target.context_id == context);

        if self.state.phase != Phase::AwaitingReady || !is_tracked {
            debug!(
                event = "core.cycle.ready_ignored",
                context_id = %context,
                phase = self.state.phase.as_str(),
            );
            return;
        }

        let (Some(settings), Some(target)) = (self.settings.clone(), self.tracker.current().cloned())
        else {
            return;
        };
        let cycle = self.state.cycle_count;

        self.logger
            .info(&format!("Cycle #{}: Content script ready", cycle));

        self.state.timers.cancel_phase();
        self.state.phase = Phase::Waiting;
        self.state.timers.set_ticker(spawn_countdown(
            self.gateway.clone(),
            target,
            LABEL_UNTIL_CLICK,
            settings.wait(),
        ));

        self.logger.info(&format!(
            "Cycle #{}: Waiting {}s before clicking button",
            cycle,
            settings.wait_secs()
        ));
        self.state
            .timers
            .arm_phase(settings.wait(), &self.timer_events);
    }

    /// The host reports that `context` is gone for good.
    pub async fn on_context_closed(&mut self, context: &ContextId) {
        let is_tracked = self
            .tracker
            .current()
            .is_some_and(|target| &target.context_id == context);

        if !is_tracked || !self.state.phase.is_running() {
            return;
        }

        warn!(event = "core.cycle.target_closed", context_id = %context);
        self.logger.error("Configured tab no longer exists");
        self.stop().await;
    }

    /// Advance the machine after the phase timer elapsed.
    pub async fn on_phase_timer(&mut self, fired: PhaseTimerFired) {
        if !self.state.timers.accept(fired) {
            debug!(
                event = "core.cycle.stale_timer_ignored",
                generation = fired.generation
            );
            return;
        }

        match self.state.phase {
            Phase::AwaitingReady => {
                let waited = self.options.ready_timeout.map_or(0, |t| t.as_secs());
                self.fail_cycle(&format!(
                    "Cycle #{}: Page did not signal readiness within {}s",
                    self.state.cycle_count, waited
                ));
            }
            Phase::Waiting => self.click().await,
            Phase::Cooldown => self.begin_cycle().await,
            phase => {
                debug!(
                    event = "core.cycle.timer_unexpected_phase",
                    phase = phase.as_str()
                );
            }
        }
    }

    /// Cancel everything without notifying the target. Used when the
    /// controller itself goes away.
    pub fn shutdown(&mut self) {
        self.state.timers.cancel_all();
        self.state.phase = Phase::Idle;
        self.tracker.clear();
        self.logger.detach_target();
    }

    /// Count, verify liveness, reload, then wait for readiness.
    async fn begin_cycle(&mut self) {
        let Some(target) = self.tracker.current().cloned() else {
            self.state.phase = Phase::Idle;
            return;
        };

        self.state.cycle_count += 1;
        let cycle = self.state.cycle_count;

        if !self.host.context_exists(&target.context_id).await {
            warn!(
                event = "core.cycle.target_missing",
                context_id = %target.context_id,
                cycle = cycle,
            );
            self.logger.error("Configured tab no longer exists");
            self.stop().await;
            return;
        }

        self.state.phase = Phase::Reloading;
        self.logger.info(&format!(
            "Cycle #{}: Initiating refresh at {}",
            cycle,
            clock_time(chrono::Local::now())
        ));
        self.logger.info(&format!(
            "Cycle #{}: Refreshing page and waiting for content script",
            cycle
        ));

        if let Err(e) = self.host.reload(&target.context_id).await {
            self.fail_cycle(&format!("Error in refresh cycle: {}", e));
            return;
        }

        info!(
            event = "core.cycle.reload_completed",
            context_id = %target.context_id,
            cycle = cycle,
        );

        self.state.phase = Phase::AwaitingReady;
        if let Some(timeout) = self.options.ready_timeout {
            self.state.timers.arm_phase(timeout, &self.timer_events);
        }
    }

    async fn click(&mut self) {
        self.state.timers.cancel_ticker();

        let Some(settings) = self.settings.clone() else {
            return;
        };
        let cycle = self.state.cycle_count;

        self.state.phase = Phase::Clicking;
        self.logger.info(&format!(
            "Cycle #{}: Attempting to click button {}",
            cycle,
            settings.button_selector()
        ));

        let request = TargetRequest::click(settings.button_selector());
        let result = self.gateway.send(self.tracker.current(), &request).await;

        match result {
            Ok(Some(response)) if response.success => {
                let clicked_at = chrono::Local::now();
                self.logger.info(&format!(
                    "Cycle #{}: Button click successful at {}",
                    cycle,
                    clock_time(clicked_at)
                ));

                let next_refresh = chrono::TimeDelta::from_std(settings.refresh_interval())
                    .ok()
                    .and_then(|delta| clicked_at.checked_add_signed(delta));
                if let Some(next_refresh) = next_refresh {
                    self.logger.info(&format!(
                        "Cycle #{}: Next refresh scheduled for {} ({}s from button click)",
                        cycle,
                        clock_time(next_refresh),
                        settings.refresh_interval_secs()
                    ));
                }

                info!(event = "core.cycle.click_completed", cycle = cycle);
                self.schedule_next_cycle(&settings, true);
            }
            Ok(_) => {
                self.logger.error(&format!(
                    "Cycle #{}: Button click failed - button not found",
                    cycle
                ));
                self.logger.info(&format!(
                    "Cycle #{}: Scheduling retry in {}s",
                    cycle,
                    settings.refresh_interval_secs()
                ));
                self.schedule_next_cycle(&settings, false);
            }
            Err(e) => {
                self.logger.error(&format!(
                    "Cycle #{}: Button click failed - {}",
                    cycle, e
                ));
                self.logger.info(&format!(
                    "Cycle #{}: Scheduling retry in {}s",
                    cycle,
                    settings.refresh_interval_secs()
                ));
                self.schedule_next_cycle(&settings, false);
            }
        }
    }

    /// Log a non-fatal cycle failure and retry after the refresh interval.
    fn fail_cycle(&mut self, message: &str) {
        self.logger.error(message);
        self.state.timers.cancel_ticker();

        match self.settings.clone() {
            Some(settings) => self.schedule_next_cycle(&settings, false),
            None => self.state.phase = Phase::Idle,
        }
    }

    fn schedule_next_cycle(&mut self, settings: &Settings, with_countdown: bool) {
        self.state.phase = Phase::Cooldown;

        if with_countdown && let Some(target) = self.tracker.current().cloned() {
            self.state.timers.set_ticker(spawn_countdown(
                self.gateway.clone(),
                target,
                LABEL_UNTIL_REFRESH,
                settings.refresh_interval(),
            ));
        }

        self.state
            .timers
            .arm_phase(settings.refresh_interval(), &self.timer_events);
    }
}
