use crate::errors::AutoclickError;
use crate::host::HostError;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("No active tab found")]
    NoActiveContext,

    #[error("Host operation failed: {source}")]
    Host {
        #[from]
        source: HostError,
    },

    #[error("Cycle controller is no longer running")]
    ControllerGone,
}

impl AutoclickError for ControllerError {
    fn error_code(&self) -> &'static str {
        match self {
            ControllerError::NoActiveContext => "NO_ACTIVE_CONTEXT",
            ControllerError::Host { .. } => "HOST_ERROR",
            ControllerError::ControllerGone => "CONTROLLER_GONE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ControllerError::NoActiveContext)
    }
}
