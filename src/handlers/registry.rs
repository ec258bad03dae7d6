//! Event handler registry and dispatch.
//!
//! The `Registry` maps command names to ordered handler lists and broadcasts
//! each dispatched event to every matching handler. Handlers registered by
//! the client itself are marked built-in and survive caller-side removal.
//!
//! Dispatch order for one event is fixed: handlers registered for the exact
//! command first (built-ins ahead of caller handlers, each group in
//! registration order), then handlers registered for [`ALL_EVENTS`]. Every
//! handler receives its own clone of the event.

use dashmap::DashMap;
use slirc_proto::command::ALL_EVENTS;
use slirc_proto::Event;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, span, trace, Level};

use crate::client::Client;

/// A reaction to a dispatched event.
///
/// Implemented for any `Fn(&Client, Event) + Send + Sync`, so plain
/// functions and closures can be registered directly.
pub trait Handler: Send + Sync {
    fn handle(&self, client: &Client, event: Event);
}

impl<F> Handler for F
where
    F: Fn(&Client, Event) + Send + Sync,
{
    fn handle(&self, client: &Client, event: Event) {
        self(client, event)
    }
}

/// Identifies one registration, for [`Registry::unregister`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId {
    command: String,
    seq: u64,
}

impl HandlerId {
    /// Command the handler was registered for.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.command, self.seq)
    }
}

struct Entry {
    seq: u64,
    builtin: bool,
    handler: Arc<dyn Handler>,
}

/// Registry of event handlers.
pub struct Registry {
    handlers: DashMap<String, Vec<Entry>>,
    next_seq: AtomicU64,
    /// Dispatch counters for commands with exact-match handlers
    dispatch_counts: DashMap<String, AtomicU64>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.handlers.len())
            .field("handlers", &self.len())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            next_seq: AtomicU64::new(0),
            dispatch_counts: DashMap::new(),
        }
    }

    /// Register a caller handler for `command` (case-insensitive), or for
    /// every event with [`ALL_EVENTS`].
    pub fn register<H>(&self, command: &str, handler: H) -> HandlerId
    where
        H: Handler + 'static,
    {
        self.insert(false, command, Arc::new(handler))
    }

    pub(crate) fn register_builtin<H>(&self, command: &str, handler: H) -> HandlerId
    where
        H: Handler + 'static,
    {
        self.insert(true, command, Arc::new(handler))
    }

    fn insert(&self, builtin: bool, command: &str, handler: Arc<dyn Handler>) -> HandlerId {
        let command = command.to_ascii_uppercase();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let entry = Entry {
            seq,
            builtin,
            handler,
        };

        let mut list = self.handlers.entry(command.clone()).or_default();
        if builtin {
            // Built-ins run ahead of caller handlers.
            let at = list.iter().position(|e| !e.builtin).unwrap_or(list.len());
            list.insert(at, entry);
        } else {
            list.push(entry);
        }
        drop(list);

        debug!(command = %command, seq, builtin, "Registered handler");
        HandlerId { command, seq }
    }

    /// Remove a caller handler. Returns `false` if it was not found or is a
    /// built-in.
    pub fn unregister(&self, id: &HandlerId) -> bool {
        let Some(mut list) = self.handlers.get_mut(&id.command) else {
            return false;
        };
        let Some(at) = list.iter().position(|e| e.seq == id.seq) else {
            return false;
        };
        if list[at].builtin {
            debug!(handler = %id, "Refusing to unregister built-in handler");
            return false;
        }
        list.remove(at);
        drop(list);

        self.handlers.remove_if(&id.command, |_, list| list.is_empty());
        debug!(handler = %id, "Unregistered handler");
        true
    }

    /// Remove all caller handlers for `command`.
    pub fn clear(&self, command: &str) {
        let command = command.to_ascii_uppercase();
        if let Some(mut list) = self.handlers.get_mut(&command) {
            list.retain(|e| e.builtin);
        }
        self.handlers.remove_if(&command, |_, list| list.is_empty());
        debug!(command = %command, "Cleared handlers");
    }

    /// Remove every caller handler.
    pub fn clear_all(&self) {
        self.handlers.retain(|_, list| {
            list.retain(|e| e.builtin);
            !list.is_empty()
        });
        debug!("Cleared all handlers");
    }

    /// Remove the built-in handlers, leaving caller handlers in place.
    pub(crate) fn clear_builtins(&self) {
        self.handlers.retain(|_, list| {
            list.retain(|e| !e.builtin);
            !list.is_empty()
        });
    }

    /// Number of registered handlers, built-ins included.
    pub fn len(&self) -> usize {
        self.handlers.iter().map(|list| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of handlers registered for exactly `command`.
    pub fn count(&self, command: &str) -> usize {
        self.handlers
            .get(&command.to_ascii_uppercase())
            .map_or(0, |list| list.len())
    }

    /// Get dispatch statistics, most frequent first.
    ///
    /// Events reaching only wildcard handlers are not counted.
    pub fn dispatch_stats(&self) -> Vec<(String, u64)> {
        let mut stats: Vec<_> = self
            .dispatch_counts
            .iter()
            .map(|e| (e.key().clone(), e.value().load(Ordering::Relaxed)))
            .collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }

    fn snapshot(&self, command: &str) -> Vec<Arc<dyn Handler>> {
        self.handlers
            .get(command)
            .map(|list| list.iter().map(|e| Arc::clone(&e.handler)).collect())
            .unwrap_or_default()
    }

    /// Broadcast `event` to every matching handler. Commands match
    /// case-insensitively, as in [`register`](Self::register).
    ///
    /// The handler lists are copied out before any handler runs, so a
    /// handler may register or unregister others; such changes take effect
    /// from the next dispatch.
    pub fn dispatch(&self, client: &Client, event: &Event) {
        let command = event.command.to_ascii_uppercase();
        let mut handlers = Vec::new();
        if command != ALL_EVENTS {
            handlers = self.snapshot(&command);
            // Only commands someone listens for get a counter.
            if !handlers.is_empty() {
                self.dispatch_counts
                    .entry(command.clone())
                    .or_default()
                    .fetch_add(1, Ordering::Relaxed);
            }
        }
        handlers.extend(self.snapshot(ALL_EVENTS));

        let span = span!(Level::TRACE, "irc.dispatch", command = %command);
        let _enter = span.enter();
        trace!(handlers = handlers.len(), "Dispatching event");

        for handler in handlers {
            handler.handle(client, event.clone());
        }
    }
}
