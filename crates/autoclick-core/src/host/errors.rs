use crate::errors::AutoclickError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    #[error("Context '{context}' is not ready to receive messages")]
    ContextUnavailable { context: String },

    #[error("Context '{context}' no longer exists")]
    ContextClosed { context: String },

    #[error("Timed out waiting for a reply from context '{context}'")]
    ResponseTimeout { context: String },

    #[error("Channel to the target closed")]
    ChannelClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl HostError {
    /// Errors worth retrying: the receiver may simply not be loaded yet.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HostError::ContextUnavailable { .. } | HostError::ResponseTimeout { .. }
        )
    }
}

impl AutoclickError for HostError {
    fn error_code(&self) -> &'static str {
        match self {
            HostError::ContextUnavailable { .. } => "CONTEXT_UNAVAILABLE",
            HostError::ContextClosed { .. } => "CONTEXT_CLOSED",
            HostError::ResponseTimeout { .. } => "RESPONSE_TIMEOUT",
            HostError::ChannelClosed => "CHANNEL_CLOSED",
            HostError::Protocol(_) => "HOST_PROTOCOL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let unavailable = HostError::ContextUnavailable {
            context: "tab-1".to_string(),
        };
        let closed = HostError::ContextClosed {
            context: "tab-1".to_string(),
        };
        assert!(unavailable.is_transient());
        assert!(!closed.is_transient());
        assert!(!HostError::ChannelClosed.is_transient());
    }
}
