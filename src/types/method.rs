// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol method names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A method name of the `WattBox` line protocol.
///
/// Methods the library interprets have their own variant; everything else
/// is carried verbatim in [`Method::Other`].
///
/// # Examples
///
/// ```
/// use wattbox_lib::types::Method;
///
/// assert_eq!(Method::from("OutletStatus"), Method::OutletStatus);
/// assert_eq!(Method::from("Hostname"), Method::Hostname);
/// assert_eq!(Method::from("UPSStatus").as_str(), "UPSStatus");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Device model string.
    Model,
    /// Device serial number.
    Serial,
    /// Firmware version.
    Firmware,
    /// Network host name.
    Hostname,
    /// Service tag.
    ServiceTag,
    /// Number of switchable outlets.
    OutletCount,
    /// Outlet display names.
    OutletName,
    /// Outlet power states.
    OutletStatus,
    /// Outlet control command.
    OutletSet,
    /// Any method the library stores without interpreting.
    Other(String),
}

impl Method {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Model => "Model",
            Self::Serial => "Serial",
            Self::Firmware => "Firmware",
            Self::Hostname => "Hostname",
            Self::ServiceTag => "ServiceTag",
            Self::OutletCount => "OutletCount",
            Self::OutletName => "OutletName",
            Self::OutletStatus => "OutletStatus",
            Self::OutletSet => "OutletSet",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        match name {
            "Model" => Self::Model,
            "Serial" => Self::Serial,
            "Firmware" => Self::Firmware,
            "Hostname" => Self::Hostname,
            "ServiceTag" => Self::ServiceTag,
            "OutletCount" => Self::OutletCount,
            "OutletName" => Self::OutletName,
            "OutletStatus" => Self::OutletStatus,
            "OutletSet" => Self::OutletSet,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
