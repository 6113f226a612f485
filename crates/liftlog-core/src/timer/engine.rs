//! Rest timer implementation.
//!
//! The rest timer is a wall-clock-based state machine. It does not use
//! internal threads - the caller (or [`super::RestTimerService`]) is
//! responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Idle
//!           |  ^
//!           +--+  start() again replaces the countdown
//! ```
//!
//! Remaining time is recomputed from the instant captured by `start()` on
//! every tick, so late or skipped ticks never make the countdown drift.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = RestTimer::new(DesktopNotifier::new());
//! timer.start(RestDuration::DEFAULT);
//! // In a loop:
//! timer.tick(); // Returns Some(Event::RestFinished) when the rest is over
//! ```

use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::duration::RestDuration;
use crate::clock::{Clock, SystemClock};
use crate::error::NotifyError;
use crate::events::Event;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
}

/// Point-in-time view of a rest timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub target_secs: Option<u32>,
    pub remaining_secs: u32,
    pub remaining_ms: u64,
}

impl TimerSnapshot {
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }
}

/// Title and sound used for the alert raised when a rest ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub title: String,
    pub sound: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            title: "Rest is over".into(),
            sound: "default".into(),
        }
    }
}

/// Something that can start and stop a rest countdown.
///
/// The session controller only talks to the timer through this trait, so the
/// timer never learns about exercises or sets.
pub trait RestControl {
    fn start_rest(&mut self, duration: RestDuration) -> Option<Event>;
    fn stop_rest(&mut self) -> Option<Event>;
}

/// Single rest countdown with at most one pending notification.
///
/// Operates on wall-clock deltas -- no internal thread.
pub struct RestTimer<N: Notifier, C: Clock = SystemClock> {
    notifier: N,
    clock: C,
    alert: AlertSettings,
    phase: TimerPhase,
    target: Option<RestDuration>,
    started_at: Option<Instant>,
    remaining_ms: u64,
}

impl<N: Notifier> RestTimer<N, SystemClock> {
    pub fn new(notifier: N) -> Self {
        Self::with_clock(notifier, SystemClock)
    }
}

impl<N: Notifier, C: Clock> RestTimer<N, C> {
    pub fn with_clock(notifier: N, clock: C) -> Self {
        Self {
            notifier,
            clock,
            alert: AlertSettings::default(),
            phase: TimerPhase::Idle,
            target: None,
            started_at: None,
            remaining_ms: 0,
        }
    }

    pub fn with_alert(mut self, alert: AlertSettings) -> Self {
        self.alert = alert;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Target of the current or most recent countdown.
    pub fn target(&self) -> Option<RestDuration> {
        self.target
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Remaining whole seconds, rounded up so a fresh start shows the full target.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_ms.div_ceil(1000) as u32
    }

    /// 0.0 .. 1.0 progress through the current rest.
    pub fn progress(&self) -> f64 {
        let Some(target) = self.target else {
            return 0.0;
        };
        if self.phase == TimerPhase::Idle {
            return 0.0;
        }
        let total = target.as_millis() as f64;
        (1.0 - self.remaining_ms as f64 / total).clamp(0.0, 1.0)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn state(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            target_secs: self.target.map(RestDuration::secs),
            remaining_secs: self.remaining_secs(),
            remaining_ms: self.remaining_ms,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::RestSnapshot {
            phase: self.phase,
            target_secs: self.target.map(RestDuration::secs),
            remaining_secs: self.remaining_secs(),
            remaining_ms: self.remaining_ms,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new countdown, replacing any countdown already running.
    pub fn start(&mut self, target: RestDuration) -> Event {
        let replaced = self.phase == TimerPhase::Running;

        // Drop the previous alert before scheduling a new one.
        self.notifier.cancel_all();

        self.target = Some(target);
        self.started_at = Some(self.clock.now());
        self.remaining_ms = target.as_millis();
        self.phase = TimerPhase::Running;

        match self
            .notifier
            .schedule_once(target.as_duration(), &self.alert.title, &self.alert.sound)
        {
            Ok(handle) => debug!(?handle, secs = target.secs(), "rest notification scheduled"),
            Err(NotifyError::Disabled) => debug!("rest notifications disabled"),
            Err(e) => warn!(error = %e, "failed to schedule rest notification"),
        }
        debug!(secs = target.secs(), replaced, "rest timer started");

        Event::RestStarted {
            target_secs: target.secs(),
            replaced,
            at: Utc::now(),
        }
    }

    /// Call periodically. Returns `Some(Event::RestFinished)` when the rest ends.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        let (Some(started_at), Some(target)) = (self.started_at, self.target) else {
            return None;
        };

        let elapsed = self.clock.now().saturating_duration_since(started_at);
        self.remaining_ms = target
            .as_millis()
            .saturating_sub(elapsed.as_millis() as u64);

        if self.remaining_ms > 0 {
            return None;
        }

        // The alert fires on its own at this point; leave it alone.
        self.phase = TimerPhase::Idle;
        self.started_at = None;
        debug!(secs = target.secs(), "rest timer finished");
        Some(Event::RestFinished {
            target_secs: target.secs(),
            at: Utc::now(),
        })
    }

    /// Cancel the countdown and its alert. Safe to call when idle.
    pub fn stop(&mut self) -> Option<Event> {
        self.notifier.cancel_all();
        self.started_at = None;

        if self.phase == TimerPhase::Idle {
            return None;
        }

        let remaining_secs = self.remaining_secs();
        self.phase = TimerPhase::Idle;
        self.remaining_ms = 0;
        debug!(remaining_secs, "rest timer stopped");
        Some(Event::RestStopped {
            remaining_secs,
            at: Utc::now(),
        })
    }
}

impl<N: Notifier, C: Clock> RestControl for RestTimer<N, C> {
    fn start_rest(&mut self, duration: RestDuration) -> Option<Event> {
        Some(self.start(duration))
    }

    fn stop_rest(&mut self) -> Option<Event> {
        self.stop()
    }
}

impl<N: Notifier, C: Clock> Drop for RestTimer<N, C> {
    fn drop(&mut self) {
        self.stop();
    }
}
