use autoclick_core::controller::ControllerError;
use autoclick_core::errors::AutoclickError;

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("Daemon is not running")]
    NotRunning,

    #[error("Daemon is already running at '{0}'")]
    AlreadyRunning(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("{code}: {message}")]
    Remote { code: String, message: String },

    #[error("Controller error: {source}")]
    Controller {
        #[from]
        source: ControllerError,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for DaemonError {
    fn from(e: serde_json::Error) -> Self {
        DaemonError::ProtocolError(e.to_string())
    }
}

impl From<tokio_util::codec::LinesCodecError> for DaemonError {
    fn from(e: tokio_util::codec::LinesCodecError) -> Self {
        match e {
            tokio_util::codec::LinesCodecError::Io(source) => DaemonError::Io { source },
            other => DaemonError::ProtocolError(other.to_string()),
        }
    }
}

impl AutoclickError for DaemonError {
    fn error_code(&self) -> &'static str {
        match self {
            DaemonError::NotRunning => "DAEMON_NOT_RUNNING",
            DaemonError::AlreadyRunning(_) => "DAEMON_ALREADY_RUNNING",
            DaemonError::ConnectionFailed(_) => "DAEMON_CONNECTION_FAILED",
            DaemonError::ProtocolError(_) => "DAEMON_PROTOCOL_ERROR",
            DaemonError::Remote { .. } => "DAEMON_REMOTE_ERROR",
            DaemonError::Controller { source } => source.error_code(),
            DaemonError::Io { .. } => "DAEMON_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            DaemonError::NotRunning | DaemonError::AlreadyRunning(_) | DaemonError::Remote { .. }
        )
    }
}
