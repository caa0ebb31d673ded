// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immutable state snapshots handed to subscribers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Outlet;

use super::DeviceIdentity;

/// Copy of the full device state at one point in time.
///
/// Subscribers receive a complete snapshot on every parsed value line, not
/// a diff, so consecutive notifications may be identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    data: BTreeMap<String, String>,
    identity: DeviceIdentity,
    outlets: Vec<Outlet>,
    initialized: bool,
}

impl StateSnapshot {
    pub(crate) fn new(
        data: BTreeMap<String, String>,
        identity: DeviceIdentity,
        outlets: Vec<Outlet>,
        initialized: bool,
    ) -> Self {
        Self {
            data,
            identity,
            outlets,
            initialized,
        }
    }

    /// Returns every raw value keyed by method name.
    #[must_use]
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// Returns the raw value last received for `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns the serial number, used as device id.
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        self.identity.serial.as_deref()
    }

    /// Returns the outlets in outlet order.
    #[must_use]
    pub fn outlets(&self) -> &[Outlet] {
        &self.outlets
    }

    /// Returns the power state of the outlet at 0-based `position`.
    #[must_use]
    pub fn is_on(&self, position: usize) -> Option<bool> {
        self.outlets.get(position).map(Outlet::is_on)
    }

    /// Returns the outlet names in outlet order.
    #[must_use]
    pub fn outlet_names(&self) -> Vec<&str> {
        self.outlets.iter().map(Outlet::name).collect()
    }

    /// Returns `true` if the outlet inventory was complete when taken.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
