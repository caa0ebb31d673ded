// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceState`] is the store the listener task mutates, [`StateChange`]
//! is one parsed value line, and [`StateSnapshot`] is the immutable copy
//! handed to everyone else.
//!
//! # Examples
//!
//! ```
//! use wattbox_lib::state::{DeviceState, StateChange};
//!
//! let mut state = DeviceState::new();
//! let names = vec!["Router".to_string(), "Modem".to_string()];
//! state.apply(&StateChange::outlet_names("{Router},{Modem}", names)).unwrap();
//!
//! let snapshot = state.snapshot();
//! assert_eq!(snapshot.outlet_names(), ["Router", "Modem"]);
//! ```

mod device_state;
mod snapshot;
mod state_change;

pub use device_state::{DeviceIdentity, DeviceState};
pub use snapshot::StateSnapshot;
pub use state_change::{ChangeKind, StateChange};
