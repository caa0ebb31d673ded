// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for `WattBox` device control.
//!
//! # Types
//!
//! - [`OutletIndex`] - Outlet number, converting between wire (1-based) and memory (0-based)
//! - [`OutletAction`] - On/Off/Toggle/Reset actions for `OutletSet`
//! - [`Outlet`] - Name and power state of one outlet
//! - [`Method`] - Protocol method names

mod method;
mod outlet;

pub use method::Method;
pub use outlet::{Outlet, OutletAction, OutletIndex};
