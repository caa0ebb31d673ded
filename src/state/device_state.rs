// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{Outlet, OutletIndex};

use super::{ChangeKind, StateChange, StateSnapshot};

/// Identity reported by the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Model string from `Model`.
    pub model: Option<String>,
    /// Serial number from `Serial`, used as the device id.
    pub serial: Option<String>,
}

/// Last-known state of a `WattBox` device.
///
/// Holds the raw value of every method the device reported, the device
/// identity, and the outlet array. Only the connection's listener task
/// mutates it; everyone else reads a [`StateSnapshot`].
///
/// # Outlet array
///
/// The array is sized by `OutletCount` (placeholder names) or `OutletName`
/// (real names). Once the name inventory has been received the state is
/// *initialized* and the array length is fixed; changes that would resize
/// it are rejected until [`reset_initialization`](Self::reset_initialization).
/// A name list that disagrees with a reported `OutletCount`, or that is
/// empty, is rejected as well.
///
/// # Examples
///
/// ```
/// use wattbox_lib::state::{DeviceState, StateChange};
///
/// let mut state = DeviceState::new();
/// state.apply(&StateChange::outlet_count("4", 4)).unwrap();
///
/// assert_eq!(state.outlet_names(), ["outlet 1", "outlet 2", "outlet 3", "outlet 4"]);
/// assert!(!state.is_initialized());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    data: BTreeMap<String, String>,
    identity: DeviceIdentity,
    outlets: Vec<Outlet>,
    reported_count: Option<usize>,
    initialized: bool,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a change.
    ///
    /// Returns `true` if this change completed the outlet inventory, which
    /// happens at most once between two calls to
    /// [`reset_initialization`](Self::reset_initialization).
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the change would resize the
    /// outlet array after initialization, or if an `OutletName` list is empty
    /// or does not match the reported outlet count. The state is left
    /// untouched.
    pub fn apply(&mut self, change: &StateChange) -> Result<bool, ParseError> {
        let mut completed = false;

        match change.kind() {
            ChangeKind::Model(model) => self.identity.model = Some(model.clone()),
            ChangeKind::Serial(serial) => self.identity.serial = Some(serial.clone()),
            ChangeKind::OutletCount(count) => self.apply_outlet_count(*count)?,
            ChangeKind::OutletNames(names) => {
                self.apply_outlet_names(names)?;
                completed = !self.initialized;
                self.initialized = true;
            }
            ChangeKind::OutletStatus(states) => self.apply_outlet_status(states),
            ChangeKind::Stored => {}
        }

        self.data
            .insert(change.method().as_str().to_string(), change.raw().to_string());
        Ok(completed)
    }

    fn apply_outlet_count(&mut self, count: usize) -> Result<(), ParseError> {
        if self.outlets.len() == count {
            self.reported_count = Some(count);
            return Ok(());
        }
        if self.initialized {
            return Err(ParseError::invalid(
                "OutletCount",
                format!(
                    "outlet count changed from {} to {count} after initialization",
                    self.outlets.len()
                ),
            ));
        }
        self.outlets.clear();
        self.resize_outlets(count);
        self.reported_count = Some(count);
        Ok(())
    }

    fn resize_outlets(&mut self, len: usize) {
        let current = self.outlets.len();
        self.outlets.truncate(len);
        self.outlets.extend(
            (current..len).map(|position| Outlet::placeholder(OutletIndex::from_position(position))),
        );
    }

    fn apply_outlet_names(&mut self, names: &[String]) -> Result<(), ParseError> {
        if names.is_empty() {
            return Err(ParseError::invalid("OutletName", "empty outlet name list"));
        }
        let expected = if self.initialized {
            Some(self.outlets.len())
        } else {
            self.reported_count
        };
        if let Some(expected) = expected
            && expected != names.len()
        {
            return Err(ParseError::invalid(
                "OutletName",
                format!("{} names received for {expected} outlets", names.len()),
            ));
        }
        if self.outlets.len() != names.len() {
            self.resize_outlets(names.len());
        }

        for (outlet, name) in self.outlets.iter_mut().zip(names) {
            outlet.set_name(name.as_str());
        }
        Ok(())
    }

    fn apply_outlet_status(&mut self, states: &[bool]) {
        if self.outlets.is_empty() {
            tracing::debug!("Outlet status received before outlet inventory, keeping raw value");
            return;
        }
        if states.len() != self.outlets.len() {
            tracing::warn!(
                outlets = self.outlets.len(),
                states = states.len(),
                "Outlet status length does not match outlet count"
            );
        }
        for (outlet, on) in self.outlets.iter_mut().zip(states) {
            outlet.set_on(*on);
        }
    }

    /// Marks the outlet inventory as stale.
    ///
    /// Names and states are kept so reads stay well-formed; the next
    /// `OutletName` line completes initialization again.
    pub fn reset_initialization(&mut self) {
        self.initialized = false;
    }

    /// Returns `true` once the outlet names have been received.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the raw value last received for `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Returns the power state of the outlet at 0-based `position`.
    #[must_use]
    pub fn is_on(&self, position: usize) -> Option<bool> {
        self.outlets.get(position).map(Outlet::is_on)
    }

    /// Returns the outlet names in outlet order.
    #[must_use]
    pub fn outlet_names(&self) -> Vec<String> {
        self.outlets.iter().map(|o| o.name().to_string()).collect()
    }

    /// Returns the number of known outlets.
    #[must_use]
    pub fn outlet_count(&self) -> usize {
        self.outlets.len()
    }

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Returns an immutable copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(
            self.data.clone(),
            self.identity.clone(),
            self.outlets.clone(),
            self.initialized,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn status_is_applied_positionally() {
        let mut state = DeviceState::new();
        state
            .apply(&StateChange::outlet_names("a,b,c", names(&["a", "b", "c"])))
            .unwrap();
        state
            .apply(&StateChange::outlet_status(
                "1,0,1",
                vec![true, false, true],
            ))
            .unwrap();

        assert_eq!(state.is_on(0), Some(true));
        assert_eq!(state.is_on(1), Some(false));
        assert_eq!(state.is_on(2), Some(true));
        assert_eq!(state.is_on(3), None);
    }

    #[test]
    fn count_without_names_keeps_size_invariant() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::outlet_count("4", 4)).unwrap();

        let outlet_names = state.outlet_names();
        assert_eq!(outlet_names.len(), 4);
        assert_eq!(outlet_names[3], "outlet 4");

        state
            .apply(&StateChange::outlet_status(
                "1,0,0,1",
                vec![true, false, false, true],
            ))
            .unwrap();
        assert_eq!(state.is_on(3), Some(true));
        assert_eq!(state.outlet_count(), 4);
    }

    #[test]
    fn names_complete_initialization_once() {
        let mut state = DeviceState::new();
        let change = StateChange::outlet_names("{A},{B}", names(&["A", "B"]));

        assert!(state.apply(&change).unwrap());
        assert!(state.is_initialized());
        assert!(!state.apply(&change).unwrap());
    }

    #[test]
    fn names_keep_existing_power_states() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::outlet_count("2", 2)).unwrap();
        state
            .apply(&StateChange::outlet_status("0,1", vec![false, true]))
            .unwrap();
        state
            .apply(&StateChange::outlet_names("x,y", names(&["x", "y"])))
            .unwrap();

        assert_eq!(state.outlet_names(), ["x", "y"]);
        assert_eq!(state.is_on(1), Some(true));
    }

    #[test]
    fn resize_after_initialization_is_rejected() {
        let mut state = DeviceState::new();
        state
            .apply(&StateChange::outlet_names("a,b", names(&["a", "b"])))
            .unwrap();
        let before = state.clone();

        assert!(state.apply(&StateChange::outlet_count("3", 3)).is_err());
        assert!(
            state
                .apply(&StateChange::outlet_names("a", names(&["a"])))
                .is_err()
        );
        assert_eq!(state, before);
    }

    #[test]
    fn names_disagreeing_with_count_are_rejected() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::outlet_count("4", 4)).unwrap();
        let before = state.clone();

        let err = state
            .apply(&StateChange::outlet_names("A,B,C", names(&["A", "B", "C"])))
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { .. }));
        assert_eq!(state, before);
        assert!(!state.is_initialized());
        assert_eq!(state.outlet_count(), 4);
        assert_eq!(state.value("OutletName"), None);

        assert!(
            state
                .apply(&StateChange::outlet_names(
                    "A,B,C,D",
                    names(&["A", "B", "C", "D"])
                ))
                .unwrap()
        );
        assert_eq!(state.outlet_names(), ["A", "B", "C", "D"]);
    }

    #[test]
    fn empty_name_list_is_rejected() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::outlet_count("4", 4)).unwrap();
        let before = state.clone();

        assert!(state.apply(&StateChange::outlet_names("", Vec::new())).is_err());
        assert_eq!(state, before);
        assert!(!state.is_initialized());

        let mut fresh = DeviceState::new();
        assert!(fresh.apply(&StateChange::outlet_names("", Vec::new())).is_err());
        assert!(!fresh.is_initialized());
        assert_eq!(fresh.outlet_count(), 0);
    }

    #[test]
    fn reset_initialization_allows_new_inventory() {
        let mut state = DeviceState::new();
        state
            .apply(&StateChange::outlet_names("a,b", names(&["a", "b"])))
            .unwrap();
        state.reset_initialization();

        assert_eq!(state.outlet_names(), ["a", "b"]);
        assert!(
            state
                .apply(&StateChange::outlet_names("a,b,c", names(&["a", "b", "c"])))
                .unwrap()
        );
        assert_eq!(state.outlet_count(), 3);
    }

    #[test]
    fn status_before_inventory_is_only_stored() {
        let mut state = DeviceState::new();
        state
            .apply(&StateChange::outlet_status("1,1", vec![true, true]))
            .unwrap();

        assert_eq!(state.outlet_count(), 0);
        assert_eq!(state.value("OutletStatus"), Some("1,1"));
    }

    #[test]
    fn short_status_updates_prefix_only() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::outlet_count("3", 3)).unwrap();
        state
            .apply(&StateChange::outlet_status("1", vec![true]))
            .unwrap();

        assert_eq!(state.is_on(0), Some(true));
        assert_eq!(state.is_on(2), Some(false));
        assert_eq!(state.outlet_count(), 3);
    }

    #[test]
    fn identity_fields() {
        let mut state = DeviceState::new();
        state
            .apply(&StateChange::new(
                crate::types::Method::Model,
                "WB-800-IPVM-6",
                ChangeKind::Model("WB-800-IPVM-6".into()),
            ))
            .unwrap();
        state
            .apply(&StateChange::new(
                crate::types::Method::Serial,
                "ST123",
                ChangeKind::Serial("ST123".into()),
            ))
            .unwrap();

        assert_eq!(state.identity().model.as_deref(), Some("WB-800-IPVM-6"));
        assert_eq!(state.identity().serial.as_deref(), Some("ST123"));
        assert_eq!(state.value("Model"), Some("WB-800-IPVM-6"));
    }
}
