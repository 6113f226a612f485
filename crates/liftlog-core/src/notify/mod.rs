//! Notification facility consumed by the rest timer.
//!
//! A notifier schedules exactly one alert per call and can drop everything it
//! still has pending. Delivery is best effort: the timer treats every error
//! from here as non-fatal.

mod desktop;
mod memory;

pub use desktop::DesktopNotifier;
pub use memory::{MemoryNotifier, ScheduledNotification};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Opaque id for a scheduled notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationHandle(pub u64);

pub trait Notifier {
    /// Schedule a single alert to fire `after` from now.
    fn schedule_once(
        &mut self,
        after: Duration,
        title: &str,
        sound: &str,
    ) -> Result<NotificationHandle, NotifyError>;

    /// Drop every alert that has not fired yet.
    fn cancel_all(&mut self);
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn schedule_once(
        &mut self,
        after: Duration,
        title: &str,
        sound: &str,
    ) -> Result<NotificationHandle, NotifyError> {
        (**self).schedule_once(after, title, sound)
    }

    fn cancel_all(&mut self) {
        (**self).cancel_all();
    }
}
