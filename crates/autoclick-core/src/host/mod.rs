//! The environment the controller runs against.
//!
//! A [`TargetHost`] knows which contexts exist, can reload them, and can
//! deliver a single request over the (unreliable) channel to a context.
//! Retrying is the gateway's job, not the host's.

pub mod errors;

use std::future::Future;

pub use errors::HostError;

use crate::protocol::{TargetRequest, TargetResponse};
use crate::target::{ContextId, Target};

pub trait TargetHost: Send + Sync + 'static {
    /// The context the operator is currently focused on.
    fn active_context(&self) -> impl Future<Output = Result<Option<Target>, HostError>> + Send;

    /// Whether the context still exists at all.
    fn context_exists(&self, context: &ContextId) -> impl Future<Output = bool> + Send;

    /// Ask the context to reload. Completion is signalled separately by a
    /// readiness notification, not by this call returning.
    fn reload(&self, context: &ContextId) -> impl Future<Output = Result<(), HostError>> + Send;

    /// One delivery attempt of `request`, awaiting the context's reply.
    fn deliver(
        &self,
        context: &ContextId,
        request: &TargetRequest,
    ) -> impl Future<Output = Result<TargetResponse, HostError>> + Send;

    /// Queue a line for the context's own console. Must not block.
    fn console(&self, context: &ContextId, line: &str, is_error: bool) -> Result<(), HostError>;
}
