// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `WattBox` library.
//!
//! This module provides the error hierarchy for the library: value
//! validation, connection and handshake failures, line parsing, and the
//! one-time initialization wait.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while connecting to or talking with the device.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A line or state change could not be parsed or applied.
    ///
    /// `Device` never returns this; its listener logs and discards bad
    /// lines. It is produced when `parse_line` or `DeviceState::apply` is
    /// called directly from code returning [`Result`].
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The outlet inventory was not received before the deadline.
    #[error("device initialization timed out after {0} ms")]
    InitializationTimeout(u64),

    /// The device configuration is incomplete or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid outlet action string was provided.
    #[error("invalid outlet action: {0}")]
    InvalidAction(String),

    /// A protocol method name that cannot be framed on the wire.
    #[error("invalid method name: {0:?}")]
    InvalidMethod(String),

    /// An unknown dialect name was provided.
    #[error("invalid dialect: {0}")]
    InvalidDialect(String),
}

/// Errors related to the TCP connection and login handshake.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connect or handshake step timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The device closed the socket in the middle of the handshake.
    #[error("handshake truncated while waiting for {0:?}")]
    HandshakeTruncated(String),

    /// Invalid host or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The device rejected the credentials.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Socket level failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to parsing lines received from the device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line matches none of the known grammars.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// A value line whose value could not be interpreted.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The protocol method whose value failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

impl ParseError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
