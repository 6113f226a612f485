use clap::Subcommand;
use liftlog_core::{Config, RestDuration};

use crate::context::rest_service;
use crate::countdown;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a rest countdown in the foreground
    Start {
        /// Rest length in seconds (defaults to rest.default_secs)
        secs: Option<u32>,
    },
    /// List preset rest lengths
    Presets,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        TimerAction::Start { secs } => {
            let duration = match secs {
                Some(secs) => RestDuration::from_secs(secs)?,
                None => config.rest_duration(),
            };
            let rt = countdown::runtime()?;
            rt.block_on(async {
                let mut rest = rest_service(&config);
                let started = rest.start(duration);
                println!("{}", serde_json::to_string(&started)?);
                if countdown::watch(&mut rest).await {
                    for event in rest.drain_events() {
                        println!("{}", serde_json::to_string(&event)?);
                    }
                } else {
                    println!("{}", serde_json::to_string(&rest.state())?);
                }
                Ok::<_, Box<dyn std::error::Error>>(())
            })?;
        }
        TimerAction::Presets => {
            let current = config.rest_duration();
            for preset in RestDuration::presets() {
                let marker = if preset == current { " *" } else { "" };
                println!("{:>4}s  {preset}{marker}", preset.secs());
            }
        }
    }
    Ok(())
}
