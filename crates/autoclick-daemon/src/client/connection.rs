use std::path::Path;

use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tracing::debug;

use autoclick_core::controller::{CycleStatus, StopReport};
use autoclick_core::settings::Settings;
use autoclick_core::target::Target;

use crate::errors::DaemonError;
use crate::protocol::codec::{MessageReader, message_reader, read_message, write_message};
use crate::protocol::messages::{ClientMessage, OperatorReply};

/// Operator-side client for the daemon socket.
///
/// Requests are strictly sequential: one frame out, one frame back.
pub struct DaemonClient {
    reader: MessageReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

impl DaemonClient {
    /// Connect to the daemon at the given socket path.
    pub async fn connect(socket_path: &Path) -> Result<Self, DaemonError> {
        let stream = UnixStream::connect(socket_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionRefused
                || e.kind() == std::io::ErrorKind::NotFound
            {
                DaemonError::NotRunning
            } else {
                DaemonError::ConnectionFailed(e.to_string())
            }
        })?;

        let (reader, writer) = stream.into_split();

        debug!(
            event = "daemon.client.connected",
            socket = %socket_path.display(),
        );

        Ok(Self {
            reader: message_reader(reader),
            writer,
            next_id: 1,
        })
    }

    fn next_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("req-{}", id)
    }

    async fn request(&mut self, msg: &ClientMessage) -> Result<OperatorReply, DaemonError> {
        write_message(&mut self.writer, msg).await?;
        let response: OperatorReply = read_message(&mut self.reader)
            .await?
            .ok_or_else(|| DaemonError::ConnectionFailed("connection closed".to_string()))?;
        Self::check_error(&response)?;
        Ok(response)
    }

    /// Turn an `error` reply into [`DaemonError::Remote`].
    fn check_error(response: &OperatorReply) -> Result<(), DaemonError> {
        if let OperatorReply::Error { code, message, .. } = response {
            return Err(DaemonError::Remote {
                code: code.clone(),
                message: message.clone(),
            });
        }
        Ok(())
    }

    fn unexpected(response: OperatorReply) -> DaemonError {
        DaemonError::ProtocolError(format!("unexpected reply status: {:?}", response))
    }

    /// Start the cycle on the daemon's active page.
    pub async fn start(&mut self, settings: Settings) -> Result<Target, DaemonError> {
        let id = self.next_id();
        match self.request(&ClientMessage::Start { id, settings }).await? {
            OperatorReply::Started { target, .. } => Ok(target),
            other => Err(Self::unexpected(other)),
        }
    }

    pub async fn stop(&mut self) -> Result<StopReport, DaemonError> {
        let id = self.next_id();
        match self.request(&ClientMessage::Stop { id }).await? {
            OperatorReply::Stopped { report, .. } => Ok(report),
            other => Err(Self::unexpected(other)),
        }
    }

    pub async fn status(&mut self) -> Result<CycleStatus, DaemonError> {
        let id = self.next_id();
        match self.request(&ClientMessage::Status { id }).await? {
            OperatorReply::Running { cycle, .. } | OperatorReply::Idle { cycle, .. } => Ok(cycle),
            other => Err(Self::unexpected(other)),
        }
    }

    pub async fn ping(&mut self) -> Result<(), DaemonError> {
        let id = self.next_id();
        match self.request(&ClientMessage::Ping { id }).await? {
            OperatorReply::Ack { .. } => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Ask the daemon to stop the cycle and exit.
    pub async fn shutdown(&mut self) -> Result<(), DaemonError> {
        let id = self.next_id();
        match self.request(&ClientMessage::DaemonStop { id }).await? {
            OperatorReply::Ack { .. } => Ok(()),
            other => Err(Self::unexpected(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_error_maps_remote_code() {
        let response = OperatorReply::Error {
            id: "req-1".to_string(),
            code: "NO_ACTIVE_CONTEXT".to_string(),
            message: "No active tab found".to_string(),
        };

        let err = DaemonClient::check_error(&response).unwrap_err();
        match err {
            DaemonError::Remote { code, message } => {
                assert_eq!(code, "NO_ACTIVE_CONTEXT");
                assert_eq!(message, "No active tab found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_check_error_passes_other_frames() {
        let response = OperatorReply::Ack {
            id: "req-1".to_string(),
        };
        assert!(DaemonClient::check_error(&response).is_ok());
    }

    #[tokio::test]
    async fn test_connect_without_daemon_is_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let result = DaemonClient::connect(&dir.path().join("missing.sock")).await;
        assert!(matches!(result, Err(DaemonError::NotRunning)));
    }
}
