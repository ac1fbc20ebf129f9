use std::path::PathBuf;

use tokio::signal::unix::{signal, SignalKind};

use super::*;

/// Reloads the config file on SIGHUP.
pub fn add_config_reload_task(state: &ServerState, runner: &TaskRunner, path: PathBuf) {
    runner.add(task_runner::fn_task(state.clone(), |mut alive, state| async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(hangup) => hangup,
            Err(e) => {
                log::error!("Unable to listen for SIGHUP, config reload disabled: {e}");
                return;
            }
        };

        loop {
            log::debug!("Waiting for SIGHUP signal...");

            tokio::select! {
                biased;
                _ = alive.changed() => break,
                res = hangup.recv() => {
                    if res.is_none() {
                        break;
                    }
                }
            }

            log::info!("SIGHUP received, reloading config from {}", path.display());

            match state.reload_config(&path).await {
                Ok(()) => log::info!("Config reloaded"),
                Err(e) => log::error!("Error reloading config, keeping the current one: {e}"),
            }
        }
    }));
}
