use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::{NotificationHandle, Notifier};
use crate::error::NotifyError;

/// A notification recorded by [`MemoryNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    pub handle: NotificationHandle,
    pub after: Duration,
    pub title: String,
    pub sound: String,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    pending: Vec<ScheduledNotification>,
    scheduled_total: usize,
    cancel_calls: usize,
    failure: Option<String>,
}

/// In-process notifier that only records what it was asked to do.
///
/// Clones share state, so one handle can be given to a timer while another
/// is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    state: Arc<Mutex<State>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Alerts scheduled and not yet cancelled.
    pub fn pending(&self) -> Vec<ScheduledNotification> {
        self.lock().pending.clone()
    }

    /// Total successful `schedule_once` calls.
    pub fn scheduled_total(&self) -> usize {
        self.lock().scheduled_total
    }

    pub fn cancel_calls(&self) -> usize {
        self.lock().cancel_calls
    }

    /// Make every following `schedule_once` fail with a backend error.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }
}

impl Notifier for MemoryNotifier {
    fn schedule_once(
        &mut self,
        after: Duration,
        title: &str,
        sound: &str,
    ) -> Result<NotificationHandle, NotifyError> {
        let mut state = self.lock();
        if let Some(message) = &state.failure {
            return Err(NotifyError::Backend(message.clone()));
        }
        state.next_id += 1;
        let handle = NotificationHandle(state.next_id);
        state.pending.push(ScheduledNotification {
            handle,
            after,
            title: title.to_string(),
            sound: sound.to_string(),
        });
        state.scheduled_total += 1;
        Ok(handle)
    }

    fn cancel_all(&mut self) {
        let mut state = self.lock();
        state.pending.clear();
        state.cancel_calls += 1;
    }
}
