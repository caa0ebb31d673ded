// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet control commands.

use crate::command::Command;
use crate::types::{Method, OutletAction, OutletIndex};

/// Command to switch a single outlet.
///
/// Serialized as `!OutletSet=<wire>,<ACTION>`.
///
/// # Examples
///
/// ```
/// use wattbox_lib::command::{Command, OutletSetCommand};
/// use wattbox_lib::types::OutletIndex;
///
/// let idx = OutletIndex::from_wire(2).unwrap();
///
/// assert_eq!(OutletSetCommand::on(idx).value(), Some("2,ON".to_string()));
/// assert_eq!(OutletSetCommand::reset(idx).to_line(), "!OutletSet=2,RESET\n");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutletSetCommand {
    index: OutletIndex,
    action: OutletAction,
}

impl OutletSetCommand {
    /// Creates a command applying `action` to the outlet at `index`.
    #[must_use]
    pub const fn new(index: OutletIndex, action: OutletAction) -> Self {
        Self { index, action }
    }

    /// Creates a command to turn an outlet on.
    #[must_use]
    pub const fn on(index: OutletIndex) -> Self {
        Self::new(index, OutletAction::On)
    }

    /// Creates a command to turn an outlet off.
    #[must_use]
    pub const fn off(index: OutletIndex) -> Self {
        Self::new(index, OutletAction::Off)
    }

    /// Creates a command to toggle an outlet.
    #[must_use]
    pub const fn toggle(index: OutletIndex) -> Self {
        Self::new(index, OutletAction::Toggle)
    }

    /// Creates a command to power-cycle an outlet.
    #[must_use]
    pub const fn reset(index: OutletIndex) -> Self {
        Self::new(index, OutletAction::Reset)
    }

    /// Returns the targeted outlet.
    #[must_use]
    pub const fn index(&self) -> OutletIndex {
        self.index
    }

    /// Returns the action.
    #[must_use]
    pub const fn action(&self) -> OutletAction {
        self.action
    }
}

impl Command for OutletSetCommand {
    fn method(&self) -> Method {
        Method::OutletSet
    }

    fn value(&self) -> Option<String> {
        Some(format!("{},{}", self.index.wire(), self.action))
    }
}
