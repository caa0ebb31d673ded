// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet-related types for `WattBox` devices.
//!
//! The wire protocol numbers outlets from 1, while everything stored in
//! memory is numbered from 0. [`OutletIndex`] is the single place where one
//! is converted into the other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Action applied to an outlet through the `OutletSet` command.
///
/// # Examples
///
/// ```
/// use wattbox_lib::types::OutletAction;
///
/// assert_eq!(OutletAction::On.as_str(), "ON");
/// assert_eq!(OutletAction::Reset.as_str(), "RESET");
/// assert_eq!("toggle".parse::<OutletAction>().unwrap(), OutletAction::Toggle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutletAction {
    /// Switch the outlet off.
    Off,
    /// Switch the outlet on.
    On,
    /// Invert the current outlet state.
    Toggle,
    /// Power-cycle the outlet (off, then on after the device's reset delay).
    Reset,
}

impl OutletAction {
    /// Returns the wire representation used in `OutletSet`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Toggle => "TOGGLE",
            Self::Reset => "RESET",
        }
    }
}

impl fmt::Display for OutletAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutletAction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "ON" => Ok(Self::On),
            "TOGGLE" => Ok(Self::Toggle),
            "RESET" => Ok(Self::Reset),
            _ => Err(ValueError::InvalidAction(s.to_string())),
        }
    }
}

/// Index of an outlet on the device.
///
/// Internally the index is stored as the 0-based position in the outlet
/// array. Use [`wire`](Self::wire) when talking to the device and
/// [`position`](Self::position) when indexing local state.
///
/// # Examples
///
/// ```
/// use wattbox_lib::types::OutletIndex;
///
/// let idx = OutletIndex::from_wire(3).unwrap();
/// assert_eq!(idx.wire(), 3);
/// assert_eq!(idx.position(), 2);
///
/// assert_eq!(OutletIndex::from_position(0).wire(), 1);
///
/// // Outlet 0 does not exist on the wire
/// assert!(OutletIndex::from_wire(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutletIndex(u16);

impl OutletIndex {
    /// Creates an index from the 1-based number used on the wire.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `wire` is 0.
    pub fn from_wire(wire: u16) -> Result<Self, ValueError> {
        if wire == 0 {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: u16::MAX,
                actual: 0,
            });
        }
        Ok(Self(wire - 1))
    }

    /// Creates an index from a 0-based array position.
    ///
    /// Positions past `u16::MAX - 1` saturate; no device has that many outlets.
    #[must_use]
    pub fn from_position(position: usize) -> Self {
        Self(u16::try_from(position).unwrap_or(u16::MAX - 1).min(u16::MAX - 1))
    }

    /// Returns the 1-based number used on the wire.
    #[must_use]
    pub const fn wire(&self) -> u16 {
        self.0 + 1
    }

    /// Returns the 0-based position in the outlet array.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.0 as usize
    }

    /// Checks the index against a known outlet count.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the outlet does not exist.
    pub fn check_against(self, outlet_count: usize) -> Result<Self, ValueError> {
        if self.position() < outlet_count {
            return Ok(self);
        }
        Err(ValueError::OutOfRange {
            min: 1,
            max: u16::try_from(outlet_count).unwrap_or(u16::MAX),
            actual: self.wire(),
        })
    }
}

impl fmt::Display for OutletIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

/// One switchable outlet as last reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    index: OutletIndex,
    name: String,
    is_on: bool,
}

impl Outlet {
    /// Creates an outlet with the given name, reported as off.
    #[must_use]
    pub fn new(index: OutletIndex, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            is_on: false,
        }
    }

    /// Creates an outlet carrying the placeholder name `outlet <wire>`.
    #[must_use]
    pub fn placeholder(index: OutletIndex) -> Self {
        Self::new(index, format!("outlet {}", index.wire()))
    }

    /// Returns the outlet index.
    #[must_use]
    pub fn index(&self) -> OutletIndex {
        self.index
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the outlet is powered.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn set_on(&mut self, on: bool) {
        self.is_on = on;
    }
}
