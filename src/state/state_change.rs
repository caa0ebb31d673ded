// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is produced for every value line the device sends. It
//! carries the raw value, stored verbatim under its method name, and the
//! interpretation of that value for the methods the library understands.
//!
//! # Examples
//!
//! ```
//! use wattbox_lib::state::{DeviceState, StateChange};
//!
//! let mut state = DeviceState::new();
//! state.apply(&StateChange::outlet_count("2", 2)).unwrap();
//! state.apply(&StateChange::outlet_status("0,1", vec![false, true])).unwrap();
//!
//! assert_eq!(state.is_on(1), Some(true));
//! assert_eq!(state.value("OutletStatus"), Some("0,1"));
//! ```

use serde::{Deserialize, Serialize};

use crate::types::Method;

/// Interpretation of a value line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Device model.
    Model(String),
    /// Device serial number, used as device id.
    Serial(String),
    /// Number of outlets.
    OutletCount(usize),
    /// Outlet names, in outlet order.
    OutletNames(Vec<String>),
    /// Outlet power states, in outlet order.
    OutletStatus(Vec<bool>),
    /// Value kept only in the raw data store.
    Stored,
}

/// A change to apply to the device state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    method: Method,
    raw: String,
    kind: ChangeKind,
}

impl StateChange {
    /// Creates a change from its parts.
    #[must_use]
    pub fn new(method: Method, raw: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            method,
            raw: raw.into(),
            kind,
        }
    }

    /// Creates a change stored only in the raw data store.
    #[must_use]
    pub fn stored(method: impl Into<Method>, raw: impl Into<String>) -> Self {
        Self::new(method.into(), raw, ChangeKind::Stored)
    }

    /// Creates an outlet count change.
    #[must_use]
    pub fn outlet_count(raw: impl Into<String>, count: usize) -> Self {
        Self::new(Method::OutletCount, raw, ChangeKind::OutletCount(count))
    }

    /// Creates an outlet names change.
    #[must_use]
    pub fn outlet_names(raw: impl Into<String>, names: Vec<String>) -> Self {
        Self::new(Method::OutletName, raw, ChangeKind::OutletNames(names))
    }

    /// Creates an outlet status change.
    #[must_use]
    pub fn outlet_status(raw: impl Into<String>, states: Vec<bool>) -> Self {
        Self::new(Method::OutletStatus, raw, ChangeKind::OutletStatus(states))
    }

    /// Returns the protocol method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the value exactly as received.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the interpretation of the value.
    #[must_use]
    pub fn kind(&self) -> &ChangeKind {
        &self.kind
    }
}
