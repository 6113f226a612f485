mod duration;
mod engine;
mod service;

pub use duration::{RestDuration, PRESETS};
pub use engine::{AlertSettings, RestControl, RestTimer, TimerPhase, TimerSnapshot};
pub use service::{RestTimerService, DEFAULT_TICK_INTERVAL};
