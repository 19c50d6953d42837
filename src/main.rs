mod args;
mod constants;
mod error;
mod homeassistant;
mod moisture;
mod mqtt;
mod probe;
mod settings;

use std::time::Duration;

use anyhow::{Context, Result};

use crate::{
    args::PlantProbeArgs,
    constants::{APP_NAME, APP_VERSION, RESTART_DELAY_SECS},
    error::Error,
    probe::PlantProbe,
    settings::Settings,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = PlantProbeArgs::from_env();
    if args.version {
        println!("{} {}", APP_NAME, APP_VERSION);
        return Ok(());
    }

    if args.clean {
        let settings =
            Settings::new(args.config.as_deref()).context("Failed to load settings")?;
        let app = PlantProbe::new(settings)?;
        return Ok(app.clean().await?);
    }

    // Any transport failure tears the whole app down and rebuilds it from
    // scratch after a fixed delay, discovery included.
    loop {
        let settings =
            Settings::new(args.config.as_deref()).context("Failed to load settings")?;
        let app = PlantProbe::new(settings)?;
        match app.run().await {
            Ok(()) => return Ok(()),
            Err(Error::Transport(e)) => {
                log::error!("MQTT transport failure: {}", e);
                log::info!("Restarting in {} seconds", RESTART_DELAY_SECS);
                tokio::time::sleep(Duration::from_secs(RESTART_DELAY_SECS)).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn init_logging() {
    let default_level = if cfg!(debug_assertions) {
        "plant_probe=debug"
    } else {
        "plant_probe=info"
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", default_level);
    env_logger::init_from_env(env);
}
