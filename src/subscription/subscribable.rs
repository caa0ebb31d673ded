// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for devices that publish state changes.

use std::sync::Arc;

use crate::state::StateSnapshot;
use crate::subscription::{Subscriber, SubscriptionId};

/// Trait for types that support event subscriptions.
///
/// # Examples
///
/// ```no_run
/// use wattbox_lib::Device;
/// use wattbox_lib::subscription::Subscribable;
///
/// # async fn example() -> wattbox_lib::Result<()> {
/// let device = Device::builder("192.168.1.60")
///     .credentials("wattbox", "wattbox")
///     .build()?;
///
/// let sub_id = device.on_state_changed(|snapshot| {
///     println!("outlets: {:?}", snapshot.outlet_names());
/// });
///
/// device.poll_status().await?;
///
/// device.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes a closure to state changes.
    ///
    /// The closure receives a full snapshot for every value line parsed.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateSnapshot) + Send + Sync + 'static;

    /// Subscribes a [`Subscriber`] implementation to state changes.
    fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> SubscriptionId;

    /// Subscribes to the device coming online.
    fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Subscribes to the device going offline.
    fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
