// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state subscriptions.
//!
//! - [`Subscriber`] - Receives a snapshot whenever the device state changes
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing subscribers and dispatching events

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateSnapshot;

/// Receiver of device state notifications.
///
/// Called from the listener task for every parsed value line. The listener
/// does not read the socket while a subscriber runs, so implementations
/// should hand work off instead of blocking.
///
/// Any `Fn(&StateSnapshot) + Send + Sync` closure is a subscriber.
pub trait Subscriber: Send + Sync {
    /// Called with the full state after a value line was applied.
    fn on_state_changed(&self, snapshot: &StateSnapshot);
}

impl<F> Subscriber for F
where
    F: Fn(&StateSnapshot) + Send + Sync,
{
    fn on_state_changed(&self, snapshot: &StateSnapshot) {
        self(snapshot);
    }
}

/// Unique identifier for a subscription.
///
/// IDs are unique within a device's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for connection event callbacks.
type ConnectionCallback = Arc<dyn Fn() + Send + Sync>;

/// Registry for managing device subscription callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability. Subscribers are held
/// in `Arc` and cloned out of the lock before being called, so a callback
/// may subscribe or unsubscribe without deadlocking.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_subscribers: RwLock<HashMap<SubscriptionId, Arc<dyn Subscriber>>>,
    connected_callbacks: RwLock<HashMap<SubscriptionId, ConnectionCallback>>,
    disconnected_callbacks: RwLock<HashMap<SubscriptionId, ConnectionCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_subscribers: RwLock::new(HashMap::new()),
            connected_callbacks: RwLock::new(HashMap::new()),
            disconnected_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a state subscriber.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> SubscriptionId {
        let id = self.next_id();
        self.state_subscribers.write().insert(id, subscriber);
        id
    }

    /// Registers a closure called with every new state snapshot.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateSnapshot) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(callback))
    }

    /// Registers a callback for when the device comes online.
    pub fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.connected_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for when the device goes offline.
    pub fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.disconnected_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.state_subscribers.write().remove(&id).is_some() {
            return true;
        }
        if self.connected_callbacks.write().remove(&id).is_some() {
            return true;
        }
        self.disconnected_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_subscribers.write().clear();
        self.connected_callbacks.write().clear();
        self.disconnected_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Sends a snapshot to every state subscriber.
    pub fn dispatch(&self, snapshot: &StateSnapshot) {
        let subscribers: Vec<_> = self.state_subscribers.read().values().cloned().collect();
        for subscriber in subscribers {
            subscriber.on_state_changed(snapshot);
        }
    }

    /// Dispatches the connected event.
    pub fn dispatch_connected(&self) {
        let callbacks: Vec<_> = self.connected_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Dispatches the disconnected event.
    pub fn dispatch_disconnected(&self) {
        let callbacks: Vec<_> = self
            .disconnected_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_subscribers.read().len()
            + self.connected_callbacks.read().len()
            + self.disconnected_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
