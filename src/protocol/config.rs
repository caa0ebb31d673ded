// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration for `WattBox` devices.

use std::time::Duration;

use crate::protocol::Dialect;

/// Configuration for the TCP connection to a `WattBox` device.
///
/// # Examples
///
/// ```
/// use wattbox_lib::protocol::{ConnectionConfig, Dialect};
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new("192.168.1.60")
///     .with_credentials("wattbox", "secret")
///     .with_dialect(Dialect::Banner)
///     .with_connect_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.port(), 23);
/// assert_eq!(config.dialect(), Dialect::Banner);
/// ```
#[derive(Clone)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    dialect: Dialect,
    connect_timeout: Duration,
    handshake_timeout: Duration,
    init_timeout: Duration,
}

impl ConnectionConfig {
    /// Default integration port.
    pub const DEFAULT_PORT: u16 = 23;
    /// Default timeout for establishing the TCP connection.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default timeout for the login exchange.
    pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default timeout for receiving the outlet inventory.
    pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new configuration for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            credentials: None,
            dialect: Dialect::default(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            handshake_timeout: Self::DEFAULT_HANDSHAKE_TIMEOUT,
            init_timeout: Self::DEFAULT_INIT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the login credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the protocol dialect spoken by the firmware.
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the login exchange timeout.
    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Sets how long initialization waits for the outlet inventory.
    #[must_use]
    pub fn with_init_timeout(mut self, timeout: Duration) -> Self {
        self.init_timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the handshake timeout.
    #[must_use]
    pub fn handshake_timeout(&self) -> Duration {
        self.handshake_timeout
    }

    /// Returns the initialization timeout.
    #[must_use]
    pub fn init_timeout(&self) -> Duration {
        self.init_timeout
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.credentials.as_ref().map(|(u, _)| u))
            .field("dialect", &self.dialect)
            .field("connect_timeout", &self.connect_timeout)
            .field("handshake_timeout", &self.handshake_timeout)
            .field("init_timeout", &self.init_timeout)
            .finish_non_exhaustive()
    }
}

/// Converts a duration to whole milliseconds for error reporting.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ConnectionConfig::new("pdu.local");
        assert_eq!(config.host(), "pdu.local");
        assert_eq!(config.port(), 23);
        assert!(config.credentials().is_none());
        assert_eq!(config.dialect(), Dialect::Prompt);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.handshake_timeout(), Duration::from_secs(10));
        assert_eq!(config.init_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn config_chain() {
        let config = ConnectionConfig::new("10.0.0.5")
            .with_port(2323)
            .with_credentials("admin", "pw")
            .with_dialect(Dialect::Banner)
            .with_handshake_timeout(Duration::from_secs(3))
            .with_init_timeout(Duration::from_secs(4));

        assert_eq!(config.port(), 2323);
        assert_eq!(config.credentials(), Some(("admin", "pw")));
        assert_eq!(config.dialect(), Dialect::Banner);
        assert_eq!(config.handshake_timeout(), Duration::from_secs(3));
        assert_eq!(config.init_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn debug_hides_password() {
        let config = ConnectionConfig::new("10.0.0.5").with_credentials("admin", "hunter2");
        let debug = format!("{config:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn millis_conversion() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
    }
}
