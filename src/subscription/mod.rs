// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for device state changes.
//!
//! The device pushes updates at any time, and answers to queries arrive
//! through the same channel. Subscribing is therefore the way to observe the
//! effect of a query or command.
//!
//! - [`Subscriber`] - Receives a [`StateSnapshot`](crate::state::StateSnapshot) per update
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches events
//! - [`Subscribable`] - Trait for types that support event subscriptions

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, Subscriber, SubscriptionId};
pub use subscribable::Subscribable;
