// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `WattBox` Lib - A Rust library to control `WattBox` power distribution units.
//!
//! This library talks to network-attached PDUs over their ASCII integration
//! protocol on a raw TCP socket. It logs in, reads the device identity and
//! outlet inventory, switches outlets, and keeps a live copy of the device
//! state from the lines the device pushes.
//!
//! # Supported Features
//!
//! - **Outlet control**: On, off, toggle and power-cycle individual outlets
//! - **Inventory**: Model, serial number, outlet count and names
//! - **Live state**: Every value line updates the state and notifies subscribers
//! - **Two firmware dialects**: Prompted login with flat names, or banner
//!   login with brace-delimited names
//!
//! # Quick Start
//!
//! ```no_run
//! use wattbox_lib::{Device, StateSnapshot};
//! use wattbox_lib::protocol::Dialect;
//!
//! #[tokio::main]
//! async fn main() -> wattbox_lib::Result<()> {
//!     let device = Device::builder("192.168.1.60")
//!         .credentials("wattbox", "wattbox")
//!         .dialect(Dialect::Banner)
//!         .build()?;
//!
//!     device.init(|snapshot: &StateSnapshot| {
//!         for outlet in snapshot.outlets() {
//!             println!("{} {}: {}", outlet.index(), outlet.name(), outlet.is_on());
//!         }
//!     }).await?;
//!
//!     // Fire-and-forget: the new state arrives through the subscriber
//!     device.toggle(2).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Index Convention
//!
//! Outlet commands take the 1-based number used on the wire and printed on
//! the device. Snapshot reads take the 0-based position in the outlet
//! array. [`OutletIndex`] converts between the two.

pub mod command;
mod device;
pub mod error;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use command::{Command, OutletSetCommand, QueryCommand, RawCommand};
pub use device::{Device, DeviceBuilder};
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{ConnectionConfig, ConnectionState, Dialect};
pub use state::{DeviceIdentity, StateSnapshot};
pub use subscription::{CallbackRegistry, Subscribable, Subscriber, SubscriptionId};
pub use types::{Method, Outlet, OutletAction, OutletIndex};
