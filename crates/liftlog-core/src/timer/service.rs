//! Async tick source for a [`RestTimer`].
//!
//! One tokio task per countdown ticks the timer on a fixed interval and
//! publishes snapshots on a watch channel. Restarting or stopping aborts the
//! task, so at most one tick source exists at a time.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::duration::RestDuration;
use super::engine::{RestControl, RestTimer, TimerPhase, TimerSnapshot};
use crate::clock::Clock;
use crate::events::Event;
use crate::notify::Notifier;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

type Shared<T> = Arc<Mutex<T>>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct RestTimerService<N, C>
where
    N: Notifier + Send + 'static,
    C: Clock + Send + 'static,
{
    timer: Shared<RestTimer<N, C>>,
    tick_interval: Duration,
    ticker: Option<JoinHandle<()>>,
    snapshots: Arc<watch::Sender<TimerSnapshot>>,
    events: Shared<Vec<Event>>,
}

impl<N, C> RestTimerService<N, C>
where
    N: Notifier + Send + 'static,
    C: Clock + Send + 'static,
{
    pub fn new(timer: RestTimer<N, C>) -> Self {
        let (tx, _rx) = watch::channel(timer.state());
        Self {
            timer: Arc::new(Mutex::new(timer)),
            tick_interval: DEFAULT_TICK_INTERVAL,
            ticker: None,
            snapshots: Arc::new(tx),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!("ignoring zero tick interval");
        } else {
            self.tick_interval = interval;
        }
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn state(&self) -> TimerSnapshot {
        lock(&self.timer).state()
    }

    /// Run `f` against the notifier while holding the timer lock.
    pub fn with_notifier<R>(&self, f: impl FnOnce(&mut N) -> R) -> R {
        f(lock(&self.timer).notifier_mut())
    }

    /// Events produced by the tick task (countdown completions).
    pub fn drain_events(&self) -> Vec<Event> {
        std::mem::take(&mut *lock(&self.events))
    }

    pub fn start(&mut self, target: RestDuration) -> Event {
        self.cancel_ticker();
        let (event, snapshot) = {
            let mut timer = lock(&self.timer);
            let event = timer.start(target);
            (event, timer.state())
        };
        self.snapshots.send_replace(snapshot);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                self.ticker = Some(runtime.spawn(tick_loop(
                    Arc::clone(&self.timer),
                    Arc::clone(&self.snapshots),
                    Arc::clone(&self.events),
                    self.tick_interval,
                )));
            }
            Err(_) => warn!("no async runtime; rest timer will only advance on manual tick"),
        }
        event
    }

    /// Advance the timer by hand, e.g. when no runtime is driving it.
    ///
    /// A countdown that ends here also ends the tick task.
    pub fn tick(&mut self) -> Option<Event> {
        let (event, snapshot) = {
            let mut timer = lock(&self.timer);
            (timer.tick(), timer.state())
        };
        if !snapshot.is_running() {
            self.cancel_ticker();
        }
        self.snapshots.send_replace(snapshot);
        event
    }

    /// Whether a tick task is currently alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn stop(&mut self) -> Option<Event> {
        self.cancel_ticker();
        let (event, snapshot) = {
            let mut timer = lock(&self.timer);
            (timer.stop(), timer.state())
        };
        self.snapshots.send_replace(snapshot);
        event
    }

    /// Resolve once the countdown is no longer running.
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        if rx.wait_for(|s| s.phase == TimerPhase::Idle).await.is_err() {
            debug!("snapshot channel closed while waiting for rest to end");
        }
    }

    fn cancel_ticker(&mut self) {
        if let Some(task) = self.ticker.take() {
            task.abort();
        }
    }
}

async fn tick_loop<N, C>(
    timer: Shared<RestTimer<N, C>>,
    snapshots: Arc<watch::Sender<TimerSnapshot>>,
    events: Shared<Vec<Event>>,
    period: Duration,
) where
    N: Notifier + Send + 'static,
    C: Clock + Send + 'static,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let (finished, snapshot) = {
            let mut timer = lock(&timer);
            (timer.tick(), timer.state())
        };
        let running = snapshot.is_running();
        snapshots.send_replace(snapshot);
        if let Some(event) = finished {
            lock(&events).push(event);
        }
        if !running {
            break;
        }
    }
}

impl<N, C> RestControl for RestTimerService<N, C>
where
    N: Notifier + Send + 'static,
    C: Clock + Send + 'static,
{
    fn start_rest(&mut self, duration: RestDuration) -> Option<Event> {
        Some(self.start(duration))
    }

    fn stop_rest(&mut self) -> Option<Event> {
        self.stop()
    }
}

impl<N, C> Drop for RestTimerService<N, C>
where
    N: Notifier + Send + 'static,
    C: Clock + Send + 'static,
{
    fn drop(&mut self) {
        self.cancel_ticker();
        lock(&self.timer).stop();
    }
}
