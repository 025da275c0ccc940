use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::controller::errors::ControllerError;
use crate::controller::machine::CycleController;
use crate::controller::timers::PhaseTimerFired;
use crate::controller::types::{ControllerOptions, CycleStatus, StopReport};
use crate::host::TargetHost;
use crate::logging::{DiagnosticSink, TracingSink};
use crate::settings::Settings;
use crate::target::{ContextId, Target};

/// Inputs accepted by the controller task.
#[derive(Debug)]
enum ControllerCommand {
    Start {
        settings: Settings,
        reply: oneshot::Sender<Result<Target, ControllerError>>,
    },
    Stop {
        reply: oneshot::Sender<StopReport>,
    },
    Status {
        reply: oneshot::Sender<CycleStatus>,
    },
    ContextReady {
        context: ContextId,
    },
    ContextClosed {
        context: ContextId,
    },
}

/// Cheap, cloneable handle to a running controller task.
///
/// The task ends, cancelling any live timers, once every handle is dropped.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<ControllerCommand>,
}

/// Spawn a controller whose local diagnostic lines go to `tracing`.
pub fn spawn_controller<H: TargetHost>(host: Arc<H>, options: ControllerOptions) -> ControllerHandle {
    spawn_controller_with_sink(host, options, Arc::new(TracingSink))
}

/// Spawn a controller writing its local diagnostic lines to `local_sink`.
pub fn spawn_controller_with_sink<H: TargetHost>(
    host: Arc<H>,
    options: ControllerOptions,
    local_sink: Arc<dyn DiagnosticSink>,
) -> ControllerHandle {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (timer_tx, timer_rx) = mpsc::unbounded_channel();

    let controller = CycleController::new(host, options, local_sink, timer_tx);
    tokio::spawn(run_controller(controller, commands_rx, timer_rx));

    ControllerHandle {
        commands: commands_tx,
    }
}

async fn run_controller<H: TargetHost>(
    mut controller: CycleController<H>,
    mut commands: mpsc::UnboundedReceiver<ControllerCommand>,
    mut timer_events: mpsc::UnboundedReceiver<PhaseTimerFired>,
) {
    debug!(event = "core.controller.task_started");

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => handle_command(&mut controller, command).await,
                None => break,
            },
            Some(fired) = timer_events.recv() => controller.on_phase_timer(fired).await,
        }
    }

    controller.shutdown();
    debug!(event = "core.controller.task_stopped");
}

async fn handle_command<H: TargetHost>(
    controller: &mut CycleController<H>,
    command: ControllerCommand,
) {
    match command {
        ControllerCommand::Start { settings, reply } => {
            let result = controller.start(settings).await;
            let _ = reply.send(result);
        }
        ControllerCommand::Stop { reply } => {
            let report = controller.stop().await;
            let _ = reply.send(report);
        }
        ControllerCommand::Status { reply } => {
            let _ = reply.send(controller.status());
        }
        ControllerCommand::ContextReady { context } => controller.on_context_ready(&context),
        ControllerCommand::ContextClosed { context } => {
            controller.on_context_closed(&context).await
        }
    }
}

impl ControllerHandle {
    pub async fn start(&self, settings: Settings) -> Result<Target, ControllerError> {
        let (reply, response) = oneshot::channel();
        self.send(ControllerCommand::Start { settings, reply })?;
        response.await.map_err(|_| ControllerError::ControllerGone)?
    }

    pub async fn stop(&self) -> Result<StopReport, ControllerError> {
        let (reply, response) = oneshot::channel();
        self.send(ControllerCommand::Stop { reply })?;
        response.await.map_err(|_| ControllerError::ControllerGone)
    }

    pub async fn status(&self) -> Result<CycleStatus, ControllerError> {
        let (reply, response) = oneshot::channel();
        self.send(ControllerCommand::Status { reply })?;
        response.await.map_err(|_| ControllerError::ControllerGone)
    }

    /// Readiness notification from a (re)loaded context.
    pub fn context_ready(&self, context: ContextId) -> Result<(), ControllerError> {
        self.send(ControllerCommand::ContextReady { context })
    }

    /// The context disappeared (tab closed, bridge disconnected).
    pub fn context_closed(&self, context: ContextId) -> Result<(), ControllerError> {
        self.send(ControllerCommand::ContextClosed { context })
    }

    fn send(&self, command: ControllerCommand) -> Result<(), ControllerError> {
        self.commands
            .send(command)
            .map_err(|_| ControllerError::ControllerGone)
    }
}
