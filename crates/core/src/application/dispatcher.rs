// Change Event Dispatcher - the trigger interface exposed to the hosting runtime
//
// The runtime (or a thin adapter in front of it) feeds store change events in;
// the registration table maps (collection, change kind) to handlers. Handlers
// contain their own failures: a dispatched event is considered handled either
// way, so nothing here returns an error to the runtime.

use crate::port::Document;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Kind of store change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
}

/// A change event emitted by the data store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    Created {
        collection: String,
        document: Document,
    },
    Updated {
        collection: String,
        before: Document,
        after: Document,
    },
}

impl ChangeEvent {
    pub fn collection(&self) -> &str {
        match self {
            ChangeEvent::Created { collection, .. } => collection,
            ChangeEvent::Updated { collection, .. } => collection,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeEvent::Created { .. } => ChangeKind::Created,
            ChangeEvent::Updated { .. } => ChangeKind::Updated,
        }
    }
}

/// Binding of a handler to one collection and change kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerBinding {
    pub collection: String,
    pub kind: ChangeKind,
}

impl TriggerBinding {
    pub fn created(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            kind: ChangeKind::Created,
        }
    }

    pub fn updated(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            kind: ChangeKind::Updated,
        }
    }

    fn matches(&self, event: &ChangeEvent) -> bool {
        self.collection == event.collection() && self.kind == event.kind()
    }
}

/// Reactive entry point invoked per matching change event
#[async_trait]
pub trait ChangeHandler: Send + Sync {
    /// Stable name for logs
    fn name(&self) -> &'static str;

    /// Handle one event. Failures must be contained inside the handler.
    async fn handle(&self, event: &ChangeEvent);
}

/// Registration table mapping event kind to handlers
pub struct Dispatcher {
    handlers: Vec<(TriggerBinding, Arc<dyn ChangeHandler>)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn register(&mut self, binding: TriggerBinding, handler: Arc<dyn ChangeHandler>) {
        self.handlers.push((binding, handler));
    }

    /// Invoke every handler bound to this event's collection and kind.
    /// Handlers run sequentially; each dispatch is an isolated unit of work.
    pub async fn dispatch(&self, event: &ChangeEvent) {
        let mut matched = false;
        for (binding, handler) in &self.handlers {
            if binding.matches(event) {
                matched = true;
                debug!(
                    handler = handler.name(),
                    collection = event.collection(),
                    "Dispatching change event"
                );
                handler.handle(event).await;
            }
        }
        if !matched {
            debug!(
                collection = event.collection(),
                kind = ?event.kind(),
                "No handler bound for change event"
            );
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
