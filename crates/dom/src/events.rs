//! Event listeners and bubbling dispatch
//!
//! Listeners are keyed by (node, event type) and run in registration
//! order. Dispatch snapshots the propagation path and every listener
//! list up front, then releases all borrows before calling out, so a
//! listener may freely read or mutate the tree and the registry.
//!
//! ```text
//! click on <a>:  a → li → ul → body → html → #document
//!                ↑ target             (bubbles=false stops here)
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use uuid::Uuid;

use crate::document::Document;
use crate::error::Result;
use crate::types::NodeId;

/// Listener callback. Single-threaded, like the tree it observes.
pub type EventListener = Rc<dyn Fn(&Event)>;

/// Identity of one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An event in flight
#[derive(Debug)]
pub struct Event {
    event_type: String,
    target: NodeId,
    current_target: Cell<NodeId>,
    bubbles: bool,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
    document: Document,
}

impl Event {
    fn new(document: Document, event_type: &str, target: NodeId, bubbles: bool) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: Cell::new(target),
            bubbles,
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
            document,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The node the event was dispatched on
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is currently running
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// The document the event is dispatched in
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Finish the current node, then stop
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Stop before the next listener, even on the current node
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

type Entry = (ListenerId, EventListener);

/// Per-document listener storage
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: AHashMap<(NodeId, String), Vec<Entry>>,
    index: AHashMap<ListenerId, (NodeId, String)>,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, node: NodeId, event_type: &str, listener: EventListener) -> ListenerId {
        let id = ListenerId::new();
        let key = (node, event_type.to_string());
        self.listeners
            .entry(key.clone())
            .or_default()
            .push((id, listener));
        self.index.insert(id, key);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let Some(key) = self.index.remove(&id) else {
            return false;
        };
        if let Some(entries) = self.listeners.get_mut(&key) {
            entries.retain(|(entry_id, _)| *entry_id != id);
            if entries.is_empty() {
                self.listeners.remove(&key);
            }
        }
        true
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn snapshot(&self, node: NodeId, event_type: &str) -> Vec<Entry> {
        self.listeners
            .get(&(node, event_type.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }
}

impl Document {
    /// Register `listener` for `event_type` on `node`
    pub fn add_event_listener<F>(&self, node: NodeId, event_type: &str, listener: F) -> Result<ListenerId>
    where
        F: Fn(&Event) + 'static,
    {
        self.tree().get(node)?;
        let id = self
            .inner
            .listeners
            .borrow_mut()
            .add(node, event_type, Rc::new(listener));
        tracing::debug!(node, event_type, listener = %id, "added event listener");
        Ok(id)
    }

    /// Detach exactly one listener. Returns false if it was already gone.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let removed = self.inner.listeners.borrow_mut().remove(id);
        if removed {
            tracing::debug!(listener = %id, "removed event listener");
        }
        removed
    }

    /// Number of live listeners in this document
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Dispatch an event at `target`, bubbling through its ancestors when
    /// `bubbles` is set. Returns false if a listener prevented the default.
    pub fn dispatch_event(&self, target: NodeId, event_type: &str, bubbles: bool) -> Result<bool> {
        let path = {
            let tree = self.tree();
            let mut path = vec![target];
            if bubbles {
                path.extend(tree.ancestors(target)?);
            } else {
                tree.get(target)?;
            }
            path
        };

        let plan: Vec<(NodeId, Vec<Entry>)> = {
            let registry = self.inner.listeners.borrow();
            path.iter()
                .map(|&node| (node, registry.snapshot(node, event_type)))
                .filter(|(_, entries)| !entries.is_empty())
                .collect()
        };
        tracing::trace!(node = target, event_type, path_len = path.len(), nodes_with_listeners = plan.len(), "dispatching event");

        let event = Event::new(self.clone(), event_type, target, bubbles);
        for (node, entries) in plan {
            event.current_target.set(node);
            for (id, listener) in entries {
                // Removed by an earlier listener in this dispatch
                if !self.inner.listeners.borrow().contains(id) {
                    continue;
                }
                listener(&event);
                if event.immediate_propagation_stopped.get() {
                    break;
                }
            }
            if event.propagation_stopped.get() {
                break;
            }
        }

        Ok(!event.default_prevented())
    }

    /// Bubbling `click` on `node`
    pub fn click(&self, node: NodeId) -> Result<bool> {
        self.dispatch_event(node, "click", true)
    }
}
