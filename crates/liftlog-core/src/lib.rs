//! # Liftlog Core Library
//!
//! This library provides the core logic for the Liftlog workout tracker.
//! The CLI binary is a thin presentation layer over the same library: it
//! renders state and forwards user intents.
//!
//! ## Architecture
//!
//! - **Rest Timer**: A wall-clock-based countdown that requires the caller
//!   (or [`RestTimerService`]) to periodically invoke `tick()`, and keeps at
//!   most one rest notification pending
//! - **Catalog**: Read-only workout templates, built in or loaded from TOML
//! - **Storage**: SQLite-backed set values and TOML-based configuration
//! - **Session**: The live workout, seeded from a template and the store
//!
//! ## Key Components
//!
//! - [`RestTimer`]: Core rest countdown state machine
//! - [`SessionController`]: Set edits, completion toggles, finishing
//! - [`Database`]: Persistence of last-used set values
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod storage;
pub mod timer;

pub use catalog::{Catalog, Exercise, Template};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, NotifyError, ValidationError};
pub use events::Event;
pub use notify::{DesktopNotifier, MemoryNotifier, Notifier};
pub use session::{Session, SessionController, SetEntry, SetUpdate};
pub use storage::{Config, Database, MemoryStore, SetField, SetKey, SetStore};
pub use timer::{RestControl, RestDuration, RestTimer, RestTimerService, TimerPhase, TimerSnapshot};
