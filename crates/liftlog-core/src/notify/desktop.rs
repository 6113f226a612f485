use std::time::Duration;

use notify_rust::{Notification, Timeout};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{NotificationHandle, Notifier};
use crate::error::NotifyError;

/// Desktop notifications raised through the platform notification daemon.
///
/// Each scheduled alert is a tokio task that sleeps for the delay and then
/// shows the notification, so a runtime must be active on the calling thread.
pub struct DesktopNotifier {
    enabled: bool,
    next_id: u64,
    pending: Vec<JoinHandle<()>>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            enabled: true,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel_all();
        }
    }

    /// Hand over the pending alert tasks so a caller about to exit can await
    /// them instead of having them cancelled.
    pub fn take_pending(&mut self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut self.pending)
    }

    /// Number of alerts scheduled that have not fired or been cancelled.
    pub fn pending_count(&mut self) -> usize {
        self.pending.retain(|task| !task.is_finished());
        self.pending.len()
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn schedule_once(
        &mut self,
        after: Duration,
        title: &str,
        sound: &str,
    ) -> Result<NotificationHandle, NotifyError> {
        if !self.enabled {
            return Err(NotifyError::Disabled);
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| NotifyError::NoRuntime)?;

        self.next_id += 1;
        let id = self.next_id;
        let title = title.to_string();
        let sound = sound.to_string();

        let task = runtime.spawn(async move {
            tokio::time::sleep(after).await;
            let shown = tokio::task::spawn_blocking(move || {
                Notification::new()
                    .appname("liftlog")
                    .summary(&title)
                    .sound_name(&sound)
                    .timeout(Timeout::Milliseconds(5000))
                    .show()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .await;
            match shown {
                Ok(Ok(())) => debug!(id, "rest notification shown"),
                Ok(Err(e)) => warn!(id, error = %e, "failed to show rest notification"),
                Err(e) => warn!(id, error = %e, "notification task did not complete"),
            }
        });

        self.pending.retain(|task| !task.is_finished());
        self.pending.push(task);
        Ok(NotificationHandle(id))
    }

    fn cancel_all(&mut self) {
        for task in self.pending.drain(..) {
            task.abort();
        }
    }
}
