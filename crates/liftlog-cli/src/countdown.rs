//! Foreground rendering of a running rest countdown.

use std::io::Write;
use std::time::Duration;

use liftlog_core::TimerPhase;

use crate::context::Rest;

/// How long to let a due alert reach the desktop before exiting.
const ALERT_GRACE: Duration = Duration::from_secs(3);

/// Render the countdown until it ends or the user presses Ctrl-C.
/// Returns `true` when the rest ran to completion.
pub async fn watch(rest: &mut Rest) -> bool {
    let mut rx = rest.subscribe();
    let mut stderr = std::io::stderr();

    let finished = loop {
        let snapshot = rx.borrow_and_update().clone();
        if snapshot.phase == TimerPhase::Idle {
            break true;
        }
        let secs = snapshot.remaining_secs;
        let _ = write!(stderr, "\rrest {}:{:02} ", secs / 60, secs % 60);
        let _ = stderr.flush();

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break false;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                rest.stop();
                break false;
            }
        }
    };
    let _ = writeln!(stderr);

    if finished {
        let alerts = rest.with_notifier(|n| n.take_pending());
        for alert in alerts {
            let _ = tokio::time::timeout(ALERT_GRACE, alert).await;
        }
    }
    finished
}

pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
