// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction for `WattBox` power distribution units.
//!
//! A [`Device`] owns one TCP session to one PDU. Commands and queries are
//! fire-and-forget: they return once the line is written, and their effect
//! shows up later through the subscribers and the snapshot reads.
//!
//! ```no_run
//! use wattbox_lib::Device;
//! use wattbox_lib::state::StateSnapshot;
//!
//! # async fn example() -> wattbox_lib::Result<()> {
//! let device = Device::builder("192.168.1.60")
//!     .credentials("wattbox", "wattbox")
//!     .build()?;
//!
//! // Blocks until the outlet inventory is known
//! device.init(|snapshot: &StateSnapshot| {
//!     println!("outlets: {:?}", snapshot.outlet_names());
//! }).await?;
//!
//! device.turn_on(3).await?;
//! device.poll_status().await?;
//! # Ok(())
//! # }
//! ```

mod builder;

pub use builder::DeviceBuilder;

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::time::timeout;

use crate::command::{Command, OutletSetCommand, QueryCommand};
use crate::error::{Error, ValueError};
use crate::protocol::{Connection, ConnectionConfig, ConnectionHandler, ConnectionState, millis};
use crate::state::{DeviceState, StateChange, StateSnapshot};
use crate::subscription::{CallbackRegistry, Subscribable, Subscriber, SubscriptionId};
use crate::types::{Method, Outlet, OutletAction, OutletIndex};

/// Queries sent by [`Device::init`], in order.
const INIT_QUERIES: [Method; 4] = [
    Method::Model,
    Method::Serial,
    Method::OutletCount,
    Method::OutletName,
];

/// State shared between a device and its connection.
struct DeviceCore {
    state: RwLock<DeviceState>,
    initialized: watch::Sender<bool>,
    callbacks: CallbackRegistry,
}

impl DeviceCore {
    fn new() -> Self {
        let (initialized, _) = watch::channel(false);
        Self {
            state: RwLock::new(DeviceState::new()),
            initialized,
            callbacks: CallbackRegistry::new(),
        }
    }
}

impl ConnectionHandler for DeviceCore {
    fn on_change(&self, change: &StateChange) {
        let (snapshot, completed) = {
            let mut state = self.state.write();
            match state.apply(change) {
                Ok(completed) => (state.snapshot(), completed),
                Err(e) => {
                    tracing::warn!(method = %change.method(), error = %e, "Rejected state change");
                    return;
                }
            }
        };

        self.callbacks.dispatch(&snapshot);

        if completed {
            tracing::info!(
                outlets = snapshot.outlets().len(),
                device_id = snapshot.device_id(),
                "Outlet inventory received"
            );
            self.initialized.send_replace(true);
        }
    }

    fn on_connected(&self) {
        self.callbacks.dispatch_connected();
    }

    fn on_connection_lost(&self) {
        self.state.write().reset_initialization();
        self.initialized.send_replace(false);
        self.callbacks.dispatch_disconnected();
    }
}

/// A `WattBox` power distribution unit.
///
/// Create one with [`Device::builder`]. The connection opens lazily on the
/// first command or query and reopens after the device drops it.
///
/// Outlet commands take the 1-based outlet number printed on the device;
/// snapshot reads such as [`is_on`](Self::is_on) take a 0-based position.
pub struct Device {
    connection: Arc<Connection>,
    core: Arc<DeviceCore>,
}

impl Device {
    /// Creates a builder for the device at `host`.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> DeviceBuilder {
        DeviceBuilder::new(ConnectionConfig::new(host))
    }

    /// Creates a device from a complete configuration.
    #[must_use]
    pub fn from_config(config: ConnectionConfig) -> Self {
        let core = Arc::new(DeviceCore::new());
        let handler: Arc<dyn ConnectionHandler> = core.clone();
        Self {
            connection: Arc::new(Connection::new(config, handler)),
            core,
        }
    }

    /// Returns the connection configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        self.connection.config()
    }

    // ========== Connection Control ==========

    /// Opens the connection. Does nothing if already online.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if connecting or the handshake fails.
    pub async fn open(&self) -> Result<(), Error> {
        self.connection.open().await.map_err(Error::Protocol)
    }

    /// Closes the connection. Does nothing if already closed.
    pub async fn close(&self) {
        self.connection.close().await;
    }

    /// Checks that the device is reachable and accepts the credentials.
    ///
    /// Uses a separate socket and leaves the connection state unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if connecting or the handshake fails.
    pub async fn test_connection(&self) -> Result<(), Error> {
        self.connection.probe().await.map_err(Error::Protocol)
    }

    /// Returns `true` if the connection is established.
    #[must_use]
    pub fn online(&self) -> bool {
        self.connection.is_online()
    }

    /// Returns the connection state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    // ========== Initialization ==========

    /// Registers `subscriber` and waits for the outlet inventory.
    ///
    /// Sends the `Model`, `Serial`, `OutletCount` and `OutletName` queries,
    /// then waits until the outlet names have been received. Returns the
    /// subscription ID of `subscriber`. Can be called again after the
    /// connection was lost to refresh the inventory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if a query cannot be sent, or
    /// `Error::InitializationTimeout` if the names do not arrive within the
    /// configured init timeout. On error `subscriber` is unregistered again.
    pub async fn init<S>(&self, subscriber: S) -> Result<SubscriptionId, Error>
    where
        S: Subscriber + 'static,
    {
        let id = self.core.callbacks.subscribe(Arc::new(subscriber));
        let result = self.run_init().await;
        if result.is_err() {
            self.core.callbacks.unsubscribe(id);
        }
        result.map(|()| id)
    }

    async fn run_init(&self) -> Result<(), Error> {
        let mut ready = self.core.initialized.subscribe();

        for method in INIT_QUERIES {
            self.send_query(method).await?;
        }

        let init_timeout = self.connection.config().init_timeout();
        match timeout(init_timeout, ready.wait_for(|done| *done)).await {
            Ok(Ok(_)) => {
                tracing::debug!(host = %self.config().host(), "Device initialized");
                Ok(())
            }
            Ok(Err(_)) | Err(_) => {
                tracing::warn!(
                    host = %self.config().host(),
                    timeout_ms = millis(init_timeout),
                    "Outlet inventory not received in time"
                );
                Err(Error::InitializationTimeout(millis(init_timeout)))
            }
        }
    }

    /// Returns `true` once the outlet inventory of the current connection
    /// has been received.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        *self.core.initialized.borrow()
    }

    // ========== Queries and Commands ==========

    /// Asks the device for the power state of every outlet.
    ///
    /// The answer arrives through the subscribers.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the query cannot be sent.
    pub async fn poll_status(&self) -> Result<(), Error> {
        self.send_command(&QueryCommand::outlet_status()).await
    }

    /// Sends a `?<method>` query.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the method name cannot be framed, or
    /// `Error::Protocol` if the query cannot be sent.
    pub async fn send_query(&self, method: impl Into<Method>) -> Result<(), Error> {
        self.send_command(&QueryCommand::new(method)).await
    }

    /// Sends a command or query line.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the command cannot be framed, or
    /// `Error::Protocol` if it cannot be sent.
    pub async fn send_command<C: Command + Sync>(&self, command: &C) -> Result<(), Error> {
        command.validate()?;
        self.connection
            .send(&command.to_line())
            .await
            .map_err(Error::Protocol)
    }

    // ========== Outlet Control ==========

    /// Turns on the outlet with 1-based number `outlet`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `outlet` is 0 or beyond the known outlet
    /// count, or `Error::Protocol` if the command cannot be sent.
    pub async fn turn_on(&self, outlet: u16) -> Result<(), Error> {
        self.set_outlet(outlet, OutletAction::On).await
    }

    /// Turns off the outlet with 1-based number `outlet`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `outlet` is 0 or beyond the known outlet
    /// count, or `Error::Protocol` if the command cannot be sent.
    pub async fn turn_off(&self, outlet: u16) -> Result<(), Error> {
        self.set_outlet(outlet, OutletAction::Off).await
    }

    /// Toggles the outlet with 1-based number `outlet`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `outlet` is 0 or beyond the known outlet
    /// count, or `Error::Protocol` if the command cannot be sent.
    pub async fn toggle(&self, outlet: u16) -> Result<(), Error> {
        self.set_outlet(outlet, OutletAction::Toggle).await
    }

    /// Power-cycles the outlet with 1-based number `outlet`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `outlet` is 0 or beyond the known outlet
    /// count, or `Error::Protocol` if the command cannot be sent.
    pub async fn reset(&self, outlet: u16) -> Result<(), Error> {
        self.set_outlet(outlet, OutletAction::Reset).await
    }

    async fn set_outlet(&self, outlet: u16, action: OutletAction) -> Result<(), Error> {
        let index = self.outlet_index(outlet)?;
        self.send_command(&OutletSetCommand::new(index, action)).await
    }

    fn outlet_index(&self, outlet: u16) -> Result<OutletIndex, ValueError> {
        let index = OutletIndex::from_wire(outlet)?;
        match self.core.state.read().outlet_count() {
            0 => Ok(index),
            count => index.check_against(count),
        }
    }

    // ========== State Reads ==========

    /// Returns the power state of the outlet at 0-based `position`.
    #[must_use]
    pub fn is_on(&self, position: usize) -> Option<bool> {
        self.core.state.read().is_on(position)
    }

    /// Returns the outlet names in outlet order.
    #[must_use]
    pub fn outlet_names(&self) -> Vec<String> {
        self.core.state.read().outlet_names()
    }

    /// Returns a copy of the outlet array.
    #[must_use]
    pub fn outlets(&self) -> Vec<Outlet> {
        self.snapshot().outlets().to_vec()
    }

    /// Returns the number of known outlets.
    #[must_use]
    pub fn outlet_count(&self) -> usize {
        self.core.state.read().outlet_count()
    }

    /// Returns the device serial number.
    #[must_use]
    pub fn device_id(&self) -> Option<String> {
        self.core.state.read().identity().serial.clone()
    }

    /// Returns the device model.
    #[must_use]
    pub fn model(&self) -> Option<String> {
        self.core.state.read().identity().model.clone()
    }

    /// Returns the raw value last received for the protocol method `key`.
    #[must_use]
    pub fn get_data_value(&self, key: &str) -> Option<String> {
        self.core.state.read().value(key).map(str::to_string)
    }

    /// Returns an immutable copy of the whole device state.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.core.state.read().snapshot()
    }
}

impl Subscribable for Device {
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateSnapshot) + Send + Sync + 'static,
    {
        self.core.callbacks.on_state_changed(callback)
    }

    fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> SubscriptionId {
        self.core.callbacks.subscribe(subscriber)
    }

    fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.core.callbacks.on_connected(callback)
    }

    fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.core.callbacks.on_disconnected(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.core.callbacks.unsubscribe(id)
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.connection.shutdown_now();
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("connection", &self.connection)
            .field("initialized", &self.is_initialized())
            .field("callbacks", &self.core.callbacks)
            .finish()
    }
}
