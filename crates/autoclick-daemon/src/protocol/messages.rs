use serde::{Deserialize, Serialize};

use autoclick_core::controller::{CycleStatus, StopReport};
use autoclick_core::protocol::TargetRequest;
use autoclick_core::settings::Settings;
use autoclick_core::target::{ContextId, Target};

/// Peer -> daemon messages, tagged by `"action"`.
///
/// Operators (the CLI) send `start`/`stop`/`status`; page bridges send
/// `attach`, `focus`, `contentScriptReady` and `response`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Start the cycle on the active page.
    Start { id: String, settings: Settings },

    Stop { id: String },

    Status { id: String },

    /// Register this connection as the bridge for a page and focus it.
    Attach {
        id: String,
        context_id: ContextId,
        url: String,
    },

    /// Make a page the active one. Defaults to this connection's page.
    Focus {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context_id: Option<ContextId>,
    },

    /// A page finished loading. Defaults to this connection's page.
    ContentScriptReady {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context_id: Option<ContextId>,
    },

    /// Reply to a daemon `request`.
    Response { id: String, success: bool },

    DaemonStop { id: String },

    Ping { id: String },
}

/// Daemon -> operator replies, tagged by `"status"` and echoing the
/// request `id`.
///
/// ```json
/// {"status":"started","id":"req-1","target":{"contextId":"tab-3","originUrl":"https://..."}}
/// {"status":"error","id":"req-2","code":"NO_ACTIVE_CONTEXT","message":"No active tab found"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OperatorReply {
    Started {
        id: String,
        target: Target,
    },

    Stopped {
        id: String,
        #[serde(flatten)]
        report: StopReport,
    },

    /// Status snapshot while a cycle is running.
    Running {
        id: String,
        #[serde(flatten)]
        cycle: CycleStatus,
    },

    /// Status snapshot while nothing is running.
    Idle {
        id: String,
        #[serde(flatten)]
        cycle: CycleStatus,
    },

    /// Acknowledges `attach`, `focus`, `daemonStop` and `ping`.
    #[serde(rename = "ok")]
    Ack { id: String },

    Error {
        id: String,
        code: String,
        message: String,
    },
}

impl OperatorReply {
    /// `running` or `idle`, depending on the snapshot's phase.
    pub fn snapshot(id: String, cycle: CycleStatus) -> Self {
        if cycle.phase.is_running() {
            OperatorReply::Running { id, cycle }
        } else {
            OperatorReply::Idle { id, cycle }
        }
    }
}

/// Daemon -> page frames, tagged by `"action"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PageFrame {
    /// A command for the page; the page answers with `response` and the
    /// same `id`.
    Request { id: String, request: TargetRequest },

    /// A diagnostic line for the page's console. No reply expected.
    Console { message: String, is_error: bool },
}

/// Anything the daemon writes to a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaemonMessage {
    Reply(OperatorReply),
    Page(PageFrame),
}

impl From<OperatorReply> for DaemonMessage {
    fn from(reply: OperatorReply) -> Self {
        DaemonMessage::Reply(reply)
    }
}

impl From<PageFrame> for DaemonMessage {
    fn from(frame: PageFrame) -> Self {
        DaemonMessage::Page(frame)
    }
}
