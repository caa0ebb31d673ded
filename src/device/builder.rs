// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device builder.

use std::time::Duration;

use crate::device::Device;
use crate::error::Error;
use crate::protocol::{ConnectionConfig, Dialect};

/// Builder for creating [`Device`] instances.
///
/// Building does not touch the network; the connection is opened by the
/// first operation that needs it.
///
/// # Examples
///
/// ```
/// use wattbox_lib::Device;
/// use wattbox_lib::protocol::Dialect;
/// use std::time::Duration;
///
/// let device = Device::builder("192.168.1.60")
///     .credentials("wattbox", "wattbox")
///     .dialect(Dialect::Banner)
///     .init_timeout(Duration::from_secs(20))
///     .build()
///     .unwrap();
///
/// assert!(!device.online());
/// ```
#[derive(Debug)]
pub struct DeviceBuilder {
    config: ConnectionConfig,
}

impl DeviceBuilder {
    pub(crate) fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the login credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config = self.config.with_credentials(username, password);
        self
    }

    /// Sets the protocol dialect.
    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config = self.config.with_dialect(dialect);
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_connect_timeout(timeout);
        self
    }

    /// Sets the login exchange timeout.
    #[must_use]
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_handshake_timeout(timeout);
        self
    }

    /// Sets how long [`Device::init`] waits for the outlet inventory.
    #[must_use]
    pub fn init_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_init_timeout(timeout);
        self
    }

    /// Returns the configuration built so far.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Builds the device.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` if the host is empty or no
    /// credentials were set.
    pub fn build(self) -> Result<Device, Error> {
        if self.config.host().trim().is_empty() {
            return Err(Error::InvalidConfiguration("host is required".to_string()));
        }
        if self.config.credentials().is_none() {
            return Err(Error::InvalidConfiguration(
                "credentials are required".to_string(),
            ));
        }
        Ok(Device::from_config(self.config))
    }
}
