// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line protocol implementation for communicating with `WattBox` devices.
//!
//! The device speaks a newline-terminated ASCII protocol on a raw TCP
//! socket:
//!
//! | Direction | Shape |
//! |-----------|-------|
//! | query     | `?Method\n` |
//! | command   | `!Method=Value\n` |
//! | ack       | `OK` |
//! | nack      | `#...` |
//! | value     | `?Method=Value` or `~Method=Value` |
//!
//! Queries and their answers are not correlated: an answer arrives through
//! the same channel as any update the device pushes on its own. The
//! [`Connection`] listener applies every value line as it comes in.
//!
//! # Dialects
//!
//! Firmware revisions differ in their login exchange and in how they encode
//! outlet names. See [`Dialect`].

mod config;
mod connection;
mod dialect;
mod listener;
mod parser;

pub use config::ConnectionConfig;
pub(crate) use config::millis;
pub use connection::{Connection, ConnectionHandler, ConnectionState};
pub use dialect::{Dialect, NameEncoding};
pub use parser::{Response, parse_line};
