// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `WattBox` command definitions.
//!
//! This module provides typed representations of the lines sent to a
//! `WattBox` device.
//!
//! # Command Structure
//!
//! Every outbound line is either a query or a command:
//! - Query: `?<Method>\n`, e.g. `?OutletStatus`
//! - Command: `!<Method>=<Value>\n`, e.g. `!OutletSet=3,ON`
//!
//! Neither kind has a reply correlated to it. The device answers through the
//! same channel it uses for unsolicited updates.
//!
//! # Examples
//!
//! ```
//! use wattbox_lib::command::{Command, OutletSetCommand, QueryCommand};
//! use wattbox_lib::types::{Method, OutletAction, OutletIndex};
//!
//! let query = QueryCommand::new(Method::OutletStatus);
//! assert_eq!(query.to_line(), "?OutletStatus\n");
//!
//! let cmd = OutletSetCommand::new(OutletIndex::from_wire(3).unwrap(), OutletAction::On);
//! assert_eq!(cmd.to_line(), "!OutletSet=3,ON\n");
//! ```

mod outlet;
mod query;

pub use outlet::OutletSetCommand;
pub use query::{QueryCommand, RawCommand};

use crate::error::ValueError;
use crate::types::Method;

/// A line that can be sent to a `WattBox` device.
pub trait Command {
    /// Returns the protocol method.
    fn method(&self) -> Method;

    /// Returns the command value, or `None` for a query.
    fn value(&self) -> Option<String>;

    /// Returns the framed line, including the trailing newline.
    fn to_line(&self) -> String {
        match self.value() {
            Some(value) => format!("!{}={value}\n", self.method()),
            None => format!("?{}\n", self.method()),
        }
    }

    /// Checks that the line can be framed without corrupting the stream.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidMethod` if the method name is empty or
    /// contains framing characters, or if the value contains a line break.
    fn validate(&self) -> Result<(), ValueError> {
        let method = self.method();
        let name = method.as_str();
        let bad_name = name.is_empty()
            || name
                .chars()
                .any(|c| matches!(c, '=' | '?' | '!' | '~' | '#') || c.is_whitespace());
        let bad_value = self
            .value()
            .is_some_and(|v| v.contains(['\n', '\r']));
        if bad_name || bad_value {
            return Err(ValueError::InvalidMethod(name.to_string()));
        }
        Ok(())
    }
}
