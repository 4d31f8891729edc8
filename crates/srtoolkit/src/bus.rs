//! Message bus spanning the background, popup and content-script contexts.
//!
//! Each inbound [`Topic`] has at most one handler. Handlers receive the typed
//! [`Request`], a [`Responder`] they may consume once, and the shared options
//! injected with [`MessageBus::set_options`]. Delivery failures never cross the
//! bus: a missing handler, a failing handler or a vanished tab all resolve to
//! `None`.

pub mod message;
pub mod topic;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::error::{CoreError, CoreResult};
use crate::host::TabPort;

pub use message::{InputMode, Request, SrTextPayload, TabMessage};
pub use topic::Topic;

/// One-shot reply channel handed to a handler.
pub struct Responder {
    topic: Topic,
    tx: oneshot::Sender<Value>,
}

impl Responder {
    pub fn respond(self, value: Value) {
        if self.tx.send(value).is_err() {
            tracing::debug!(topic = %self.topic, "caller stopped waiting for response");
        }
    }
}

#[async_trait]
pub trait Handler<O: Send + Sync + 'static>: Send + Sync {
    async fn handle(
        &self,
        request: Request,
        responder: Responder,
        options: Option<Arc<O>>,
    ) -> CoreResult<()>;
}

/// Sender for the active tab that swallows delivery failures.
#[derive(Clone)]
pub struct TabChannel {
    port: Arc<dyn TabPort>,
}

impl TabChannel {
    pub fn new(port: Arc<dyn TabPort>) -> Self {
        Self { port }
    }

    pub async fn send(&self, message: TabMessage) -> Option<Value> {
        let topic = message.topic();
        match self.port.send_to_active_tab(&message).await {
            Ok(reply) => reply,
            Err(CoreError::MissingTarget(target)) => {
                tracing::debug!(topic = %topic, "no active tab to receive message: {target}");
                None
            }
            Err(error) => {
                tracing::warn!(topic = %topic, "failed to deliver message to active tab: {error}");
                None
            }
        }
    }
}

pub struct MessageBus<O: Send + Sync + 'static> {
    handlers: RwLock<HashMap<Topic, Arc<dyn Handler<O>>>>,
    options: RwLock<Option<Arc<O>>>,
    tab: TabChannel,
}

impl<O: Send + Sync + 'static> MessageBus<O> {
    pub fn new(tab: TabChannel) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            options: RwLock::new(None),
            tab,
        }
    }

    /// Shared resources passed to every handler. Replaces earlier options.
    pub fn set_options(&self, options: O) {
        *self.options.write() = Some(Arc::new(options));
    }

    /// Register the handler for `topic`.
    ///
    /// A topic keeps its first handler; later registrations are rejected, as
    /// are registrations for topics that only flow to the active tab.
    pub fn on(&self, topic: Topic, handler: Arc<dyn Handler<O>>) -> CoreResult<()> {
        if topic.is_outbound() {
            return Err(CoreError::InvalidInput(format!(
                "{topic} is delivered to the active tab and cannot have a background handler"
            )));
        }
        let mut handlers = self.handlers.write();
        if handlers.contains_key(&topic) {
            return Err(CoreError::InvalidInput(format!(
                "handler already registered for {topic}"
            )));
        }
        handlers.insert(topic, handler);
        Ok(())
    }

    pub fn has_handler(&self, topic: Topic) -> bool {
        self.handlers.read().contains_key(&topic)
    }

    /// Deliver `request` to its handler and wait for the optional response.
    ///
    /// Resolves to `None` when the handler finishes without responding, fails,
    /// or no handler is registered for the topic.
    pub async fn send_message(&self, request: Request) -> Option<Value> {
        let topic = request.topic();
        let handler = self.handlers.read().get(&topic).cloned();
        let Some(handler) = handler else {
            tracing::debug!(topic = %topic, "no handler registered; dropping message");
            return None;
        };
        let options = self.options.read().clone();

        let (tx, rx) = oneshot::channel();
        let responder = Responder { topic, tx };
        if let Err(error) = handler.handle(request, responder, options).await {
            tracing::warn!(topic = %topic, "handler failed: {error}");
        }
        rx.await.ok()
    }

    /// Fire-and-forget variant of [`MessageBus::send_message`].
    pub fn post(self: &Arc<Self>, request: Request) {
        let bus = Arc::clone(self);
        tokio::spawn(async move {
            bus.send_message(request).await;
        });
    }

    pub async fn send_message_to_active_tab(&self, message: TabMessage) -> Option<Value> {
        self.tab.send(message).await
    }
}
