use crate::errors::AutoclickError;
use crate::host::HostError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Delivery to '{context}' failed after {attempts} attempts: {source}")]
    DeliveryFailed {
        context: String,
        attempts: u32,
        #[source]
        source: HostError,
    },
}

impl AutoclickError for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            GatewayError::DeliveryFailed { .. } => "DELIVERY_FAILED",
        }
    }
}
