use std::sync::Arc;

use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use autoclick_core::controller::{ControllerError, ControllerHandle};
use autoclick_core::errors::AutoclickError;
use autoclick_core::protocol::TargetResponse;
use autoclick_core::target::ContextId;

use crate::bridge::{BridgeHost, PeerRegistration};
use crate::protocol::codec::{message_reader, read_message, write_message};
use crate::protocol::messages::{ClientMessage, DaemonMessage, OperatorReply, PageFrame};

/// Shared state every connection task needs.
#[derive(Clone)]
pub struct ConnectionContext {
    pub host: Arc<BridgeHost>,
    pub controller: ControllerHandle,
    /// Cancelled when a peer asks the daemon to exit.
    pub stop_requested: CancellationToken,
    /// Cancelled once the daemon has wound the controller down.
    pub closing: CancellationToken,
}

/// Handle a single peer connection.
///
/// The same connection may act as an operator (start/stop/status) and as a
/// page bridge (after `attach`). Operator commands run on their own task so
/// a page can keep answering requests while its own `start` is in flight.
pub async fn handle_connection(stream: UnixStream, ctx: ConnectionContext, connection_id: u64) {
    debug!(event = "daemon.connection.accepted", connection_id = connection_id);

    let (reader, mut writer) = stream.into_split();
    let mut reader = message_reader(reader);
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<OperatorReply>();
    let mut registration: Option<PeerRegistration> = None;

    loop {
        let outgoing = tokio::select! {
            result = read_message::<_, ClientMessage>(&mut reader) => {
                match result {
                    Ok(Some(msg)) => {
                        dispatch_message(msg, &ctx, &mut registration, &reply_tx);
                        continue;
                    }
                    Ok(None) => {
                        debug!(event = "daemon.connection.closed", connection_id = connection_id);
                        break;
                    }
                    Err(e) => {
                        warn!(
                            event = "daemon.connection.read_error",
                            connection_id = connection_id,
                            error = %e,
                        );
                        break;
                    }
                }
            }
            Some(reply) = reply_rx.recv() => DaemonMessage::from(reply),
            frame = next_outbound(&mut registration) => match frame {
                Some(frame) => DaemonMessage::from(frame),
                None => {
                    // Another connection re-attached the same context.
                    registration = None;
                    continue;
                }
            },
            _ = ctx.closing.cancelled() => {
                debug!(event = "daemon.connection.shutdown", connection_id = connection_id);
                break;
            }
        };

        if let Err(e) = write_message(&mut writer, &outgoing).await {
            error!(
                event = "daemon.connection.write_failed",
                connection_id = connection_id,
                error = %e,
            );
            break;
        }
    }

    if let Some(registration) = registration.take() {
        release_page(&ctx, registration);
    }
}

async fn next_outbound(registration: &mut Option<PeerRegistration>) -> Option<PageFrame> {
    match registration {
        Some(registration) => registration.outbound.recv().await,
        None => std::future::pending().await,
    }
}

/// Forget this connection's page and tell the controller it is gone.
fn release_page(ctx: &ConnectionContext, registration: PeerRegistration) {
    if ctx.host.detach(&registration)
        && let Err(e) = ctx.controller.context_closed(registration.context.clone())
    {
        debug!(event = "daemon.connection.context_closed_dropped", error = %e);
    }
}

fn error_reply(id: String, e: &impl AutoclickError) -> OperatorReply {
    OperatorReply::Error {
        id,
        code: e.error_code().to_string(),
        message: e.to_string(),
    }
}

fn not_attached(id: String) -> OperatorReply {
    OperatorReply::Error {
        id,
        code: "NOT_ATTACHED".to_string(),
        message: "Connection has not attached a page".to_string(),
    }
}

fn unknown_context(id: String, context: &ContextId) -> OperatorReply {
    OperatorReply::Error {
        id,
        code: "UNKNOWN_CONTEXT".to_string(),
        message: format!("No page attached for context '{}'", context),
    }
}

fn own_context(registration: &Option<PeerRegistration>) -> Option<ContextId> {
    registration.as_ref().map(|reg| reg.context.clone())
}

/// Route one message. Replies are queued on `replies`, never written inline.
fn dispatch_message(
    msg: ClientMessage,
    ctx: &ConnectionContext,
    registration: &mut Option<PeerRegistration>,
    replies: &mpsc::UnboundedSender<OperatorReply>,
) {
    match msg {
        ClientMessage::Start { id, settings } => {
            let controller = ctx.controller.clone();
            let replies = replies.clone();
            tokio::spawn(async move {
                let reply = match controller.start(settings).await {
                    Ok(target) => OperatorReply::Started { id, target },
                    Err(e) => {
                        log_controller_error("start", &e);
                        error_reply(id, &e)
                    }
                };
                let _ = replies.send(reply);
            });
        }

        ClientMessage::Stop { id } => {
            let controller = ctx.controller.clone();
            let replies = replies.clone();
            tokio::spawn(async move {
                let reply = match controller.stop().await {
                    Ok(report) => OperatorReply::Stopped { id, report },
                    Err(e) => {
                        log_controller_error("stop", &e);
                        error_reply(id, &e)
                    }
                };
                let _ = replies.send(reply);
            });
        }

        ClientMessage::Status { id } => {
            let controller = ctx.controller.clone();
            let replies = replies.clone();
            tokio::spawn(async move {
                let reply = match controller.status().await {
                    Ok(status) => OperatorReply::snapshot(id, status),
                    Err(e) => error_reply(id, &e),
                };
                let _ = replies.send(reply);
            });
        }

        ClientMessage::Attach {
            id,
            context_id,
            url,
        } => {
            if let Some(previous) = registration.take() {
                release_page(ctx, previous);
            }
            *registration = Some(ctx.host.attach(context_id, url));
            let _ = replies.send(OperatorReply::Ack { id });
        }

        ClientMessage::Focus { id, context_id } => {
            let reply = match context_id.or_else(|| own_context(registration)) {
                Some(context) if ctx.host.focus(&context) => OperatorReply::Ack { id },
                Some(context) => unknown_context(id, &context),
                None => not_attached(id),
            };
            let _ = replies.send(reply);
        }

        ClientMessage::ContentScriptReady { context_id } => {
            match context_id.or_else(|| own_context(registration)) {
                Some(context) => {
                    debug!(event = "daemon.connection.context_ready", context_id = %context);
                    if let Err(e) = ctx.controller.context_ready(context) {
                        log_controller_error("context_ready", &e);
                    }
                }
                None => {
                    warn!(event = "daemon.connection.ready_without_attach");
                }
            }
        }

        ClientMessage::Response { id, success } => match registration.as_ref() {
            Some(reg) => reg.resolve(&id, TargetResponse { success }),
            None => {
                warn!(event = "daemon.connection.response_without_attach", request_id = id);
            }
        },

        ClientMessage::DaemonStop { id } => {
            info!(event = "daemon.server.stop_requested");
            ctx.stop_requested.cancel();
            let _ = replies.send(OperatorReply::Ack { id });
        }

        ClientMessage::Ping { id } => {
            let _ = replies.send(OperatorReply::Ack { id });
        }
    }
}

fn log_controller_error(operation: &str, e: &ControllerError) {
    if e.is_user_error() {
        warn!(
            event = "daemon.controller.request_failed",
            operation = operation,
            error = %e,
        );
    } else {
        error!(
            event = "daemon.controller.request_failed",
            operation = operation,
            error = %e,
        );
    }
}
