//! Socket-backed [`TargetHost`].
//!
//! Every page bridge holds one connection to the daemon. The registry maps
//! each attached context to that connection's outbound queue and to the
//! table of requests still waiting for a `response`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use autoclick_core::host::{HostError, TargetHost};
use autoclick_core::protocol::{TargetRequest, TargetResponse};
use autoclick_core::target::{ContextId, Target};

use crate::protocol::messages::PageFrame;

type PendingResponses = Arc<Mutex<HashMap<String, oneshot::Sender<TargetResponse>>>>;

/// Connection-side view of an attached page.
struct Peer {
    url: String,
    outbound: mpsc::UnboundedSender<PageFrame>,
    pending: PendingResponses,
}

#[derive(Default)]
struct Registry {
    peers: HashMap<ContextId, Peer>,
    active: Option<ContextId>,
}

pub struct BridgeHost {
    registry: Mutex<Registry>,
    response_timeout: Duration,
    next_id: AtomicU64,
}

/// Handed to the connection that attached a page. Dropping it does not
/// detach; call [`BridgeHost::detach`] explicitly.
pub struct PeerRegistration {
    pub context: ContextId,
    pub outbound: mpsc::UnboundedReceiver<PageFrame>,
    pending: PendingResponses,
}

impl PeerRegistration {
    /// Complete the request `id` with the page's reply.
    pub fn resolve(&self, id: &str, response: TargetResponse) {
        let sender = lock(&self.pending).remove(id);
        match sender {
            Some(sender) => {
                let _ = sender.send(response);
            }
            None => {
                debug!(
                    event = "daemon.bridge.response_unmatched",
                    context_id = %self.context,
                    request_id = id,
                );
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl BridgeHost {
    pub fn new(response_timeout: Duration) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            response_timeout,
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a page bridge and make it the active context.
    ///
    /// Re-attaching an already known context replaces the old connection.
    pub fn attach(&self, context: ContextId, url: String) -> PeerRegistration {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let pending: PendingResponses = Arc::new(Mutex::new(HashMap::new()));

        let mut registry = lock(&self.registry);
        registry.peers.insert(
            context.clone(),
            Peer {
                url: url.clone(),
                outbound: outbound_tx,
                pending: Arc::clone(&pending),
            },
        );
        registry.active = Some(context.clone());

        info!(event = "daemon.bridge.attached", context_id = %context, url = url);

        PeerRegistration {
            context,
            outbound: outbound_rx,
            pending,
        }
    }

    pub fn focus(&self, context: &ContextId) -> bool {
        let mut registry = lock(&self.registry);
        if registry.peers.contains_key(context) {
            registry.active = Some(context.clone());
            true
        } else {
            false
        }
    }

    /// Forget a page bridge. Requests still waiting on it fail as closed.
    ///
    /// Returns false if a newer connection has since taken over the context.
    pub fn detach(&self, registration: &PeerRegistration) -> bool {
        let mut registry = lock(&self.registry);

        let owned = registry
            .peers
            .get(&registration.context)
            .is_some_and(|peer| Arc::ptr_eq(&peer.pending, &registration.pending));
        if !owned {
            return false;
        }

        registry.peers.remove(&registration.context);
        if registry.active.as_ref() == Some(&registration.context) {
            registry.active = None;
        }
        lock(&registration.pending).clear();

        info!(event = "daemon.bridge.detached", context_id = %registration.context);
        true
    }

    fn next_request_id(&self) -> String {
        format!("req-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Queue `message` for `context`'s connection.
    fn push(&self, context: &ContextId, message: PageFrame) -> Result<(), HostError> {
        let registry = lock(&self.registry);
        let peer = registry
            .peers
            .get(context)
            .ok_or_else(|| HostError::ContextUnavailable {
                context: context.to_string(),
            })?;
        peer.outbound
            .send(message)
            .map_err(|_| HostError::ContextClosed {
                context: context.to_string(),
            })
    }
}

impl TargetHost for BridgeHost {
    async fn active_context(&self) -> Result<Option<Target>, HostError> {
        let registry = lock(&self.registry);
        let target = registry.active.as_ref().and_then(|context| {
            registry
                .peers
                .get(context)
                .map(|peer| Target::new(context.clone(), peer.url.clone()))
        });
        Ok(target)
    }

    async fn context_exists(&self, context: &ContextId) -> bool {
        lock(&self.registry).peers.contains_key(context)
    }

    async fn reload(&self, context: &ContextId) -> Result<(), HostError> {
        let id = self.next_request_id();
        self.push(
            context,
            PageFrame::Request {
                id,
                request: TargetRequest::Reload,
            },
        )
    }

    async fn deliver(
        &self,
        context: &ContextId,
        request: &TargetRequest,
    ) -> Result<TargetResponse, HostError> {
        let id = self.next_request_id();
        let (reply_tx, reply_rx) = oneshot::channel();

        let pending = {
            let registry = lock(&self.registry);
            let peer = registry
                .peers
                .get(context)
                .ok_or_else(|| HostError::ContextUnavailable {
                    context: context.to_string(),
                })?;
            lock(&peer.pending).insert(id.clone(), reply_tx);
            peer.outbound
                .send(PageFrame::Request {
                    id: id.clone(),
                    request: request.clone(),
                })
                .map_err(|_| HostError::ContextClosed {
                    context: context.to_string(),
                })?;
            Arc::clone(&peer.pending)
        };

        match tokio::time::timeout(self.response_timeout, reply_rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(HostError::ContextClosed {
                context: context.to_string(),
            }),
            Err(_) => {
                lock(&pending).remove(&id);
                warn!(
                    event = "daemon.bridge.response_timeout",
                    context_id = %context,
                    request_id = id,
                    action = request.action(),
                );
                Err(HostError::ResponseTimeout {
                    context: context.to_string(),
                })
            }
        }
    }

    fn console(&self, context: &ContextId, line: &str, is_error: bool) -> Result<(), HostError> {
        self.push(
            context,
            PageFrame::Console {
                message: line.to_string(),
                is_error,
            },
        )
    }
}
