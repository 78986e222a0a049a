// Standard library imports
use std::io;
use std::thread;

// Other external crates
use anyhow::Context;
use clap::Parser;

// Local modules
mod config;
mod consts;
mod devices;
mod error;
mod obd;
mod retry;
mod state;
mod task_fusion;
mod task_gps;
mod task_httpd;
mod uart;

use crate::config::Config;
use crate::retry::RetryPolicy;
use crate::task_gps::{GpsTask, UartOpener};

#[cfg(test)]
mod task_gps_tests;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // stderr, stdout is reserved for the sentences
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let state = state::shared();

    if config.no_gps {
        log::info!("GPS disabled, the trail will stay empty");
    } else {
        let gps = GpsTask::new(
            UartOpener::new(config.gps_port.clone(), config.gps_baud),
            state.clone(),
            RetryPolicy::new(config.retry_delay()),
        );
        thread::Builder::new()
            .name("gps".into())
            .spawn(move || gps.run())
            .context("failed to spawn gps thread")?;
    }

    {
        let config = config.clone();
        let state = state.clone();
        thread::Builder::new()
            .name("fusion".into())
            .spawn(move || task_fusion::fusion_task(&config, state, io::stdout()))
            .context("failed to spawn fusion thread")?;
    }

    task_httpd::serve(config.listen, state).await
}
