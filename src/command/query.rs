// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Queries and free-form commands.

use crate::command::Command;
use crate::types::Method;

/// Query for the current value of a method (`?<Method>`).
///
/// # Examples
///
/// ```
/// use wattbox_lib::command::{Command, QueryCommand};
///
/// let query = QueryCommand::outlet_status();
/// assert_eq!(query.to_line(), "?OutletStatus\n");
/// assert_eq!(query.value(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCommand {
    method: Method,
}

impl QueryCommand {
    /// Creates a query for the given method.
    #[must_use]
    pub fn new(method: impl Into<Method>) -> Self {
        Self {
            method: method.into(),
        }
    }

    /// Queries the power state of every outlet.
    #[must_use]
    pub fn outlet_status() -> Self {
        Self::new(Method::OutletStatus)
    }
}

impl Command for QueryCommand {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn value(&self) -> Option<String> {
        None
    }
}

/// Command with an arbitrary method and value (`!<Method>=<Value>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    method: Method,
    value: String,
}

impl RawCommand {
    /// Creates a command for the given method and value.
    #[must_use]
    pub fn new(method: impl Into<Method>, value: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            value: value.into(),
        }
    }
}

impl Command for RawCommand {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn value(&self) -> Option<String> {
        Some(self.value.clone())
    }
}
