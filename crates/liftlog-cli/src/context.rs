//! Wiring shared by the commands: config, catalog, store and rest timer.

use std::path::Path;
use std::sync::Arc;

use liftlog_core::{
    Catalog, Config, Database, DesktopNotifier, RestTimer, RestTimerService, Session,
    SessionController, SystemClock,
};
use tracing::debug;

pub type Rest = RestTimerService<DesktopNotifier, SystemClock>;
pub type Controller = SessionController<Database, Rest>;

const ACTIVE_SESSION_KEY: &str = "active_session";

pub fn load_catalog(config: &Config) -> Result<Catalog, Box<dyn std::error::Error>> {
    match &config.catalog.path {
        Some(path) if !path.is_empty() => Ok(Catalog::load_toml(Path::new(path))?),
        _ => Ok(Catalog::builtin()),
    }
}

pub fn rest_service(config: &Config) -> Rest {
    let mut notifier = DesktopNotifier::new();
    notifier.set_enabled(config.notifications.enabled);
    let timer = RestTimer::new(notifier).with_alert(config.alert());
    RestTimerService::new(timer).with_tick_interval(config.tick_interval())
}

/// Build a controller and resume the stored session, if any.
pub fn controller() -> Result<Controller, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let catalog = load_catalog(&config)?;
    let db = Database::open()?;

    let stored = db.kv_get(ACTIVE_SESSION_KEY)?;
    let mut controller = SessionController::new(Arc::new(catalog), db, rest_service(&config))
        .with_rest(config.rest_duration());

    if let Some(json) = stored {
        match serde_json::from_str::<Session>(&json) {
            Ok(session) => controller.resume(session),
            Err(e) => debug!(error = %e, "discarding unreadable stored session"),
        }
    }
    Ok(controller)
}

/// Write the active session back, or clear it when the workout has ended.
pub fn save_session(controller: &Controller) -> Result<(), Box<dyn std::error::Error>> {
    let db = controller.store();
    match controller.session() {
        Some(session) => db.kv_set(ACTIVE_SESSION_KEY, &serde_json::to_string(session)?)?,
        None => {
            db.kv_delete(ACTIVE_SESSION_KEY)?;
        }
    }
    Ok(())
}
