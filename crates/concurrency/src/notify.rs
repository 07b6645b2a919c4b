//! Synchronous change notification
//!
//! Each store owns a `Notifier<E>` for its event type. Observers register a
//! callback with [`Notifier::subscribe`] and keep the returned
//! [`Subscription`]; dropping it unregisters the callback.
//!
//! ## Delivery
//!
//! `emit` runs every callback on the calling thread, in subscription order.
//! The subscriber list is snapshotted before delivery and the registry lock
//! is not held while callbacks run, so a callback may subscribe, unsubscribe
//! or read the emitting store. Stores emit only after releasing their write
//! lock.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    subscribers: Vec<(u64, Callback<E>)>,
}

impl<E> Registry<E> {
    fn take(&mut self, id: u64) -> Option<Callback<E>> {
        let pos = self.subscribers.iter().position(|(sid, _)| *sid == id)?;
        Some(self.subscribers.remove(pos).1)
    }
}

/// Fan-out of events of type `E` to any number of subscribers
pub struct Notifier<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E: 'static> Notifier<E> {
    /// Create a notifier with no subscribers
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Register `callback`; it receives every event until the handle drops
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = {
            let mut registry = self.registry.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.subscribers.push((id, Arc::new(callback)));
            id
        };

        let weak: Weak<Mutex<Registry<E>>> = Arc::downgrade(&self.registry);
        Subscription {
            id,
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    // Dropped after the registry lock is released: the
                    // callback may own other subscriptions on this notifier.
                    let removed = registry.lock().take(id);
                    drop(removed);
                }
            })),
        }
    }

    /// Deliver `event` to every current subscriber
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .registry
            .lock()
            .subscribers
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().subscribers.len()
    }
}

impl<E: 'static> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.registry.lock().subscribers.len())
            .finish()
    }
}

/// Handle keeping a callback registered
///
/// Dropping the handle unregisters the callback. Use [`Subscription::detach`]
/// to keep it for the lifetime of the notifier.
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Identifier of this subscription, unique per notifier
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Unregister now
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the callback registered until the notifier is dropped
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
