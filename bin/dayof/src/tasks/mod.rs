pub use task_runner::{Alive, TaskRunner};

use std::{path::Path, time::Duration};

use crate::prelude::*;

/// `config_path` is the file to re-read on SIGHUP, if the config came from one.
pub fn add_tasks(state: &ServerState, runner: &TaskRunner, config_path: Option<&Path>) {
    rpc_server::add_rpc_server_task(state, runner);
    invite_cleanup::add_invite_cleanup_task(state, runner);
    invite_counters::add_invite_counters_task(state, runner);

    #[cfg(unix)]
    if let Some(path) = config_path {
        config_reload::add_config_reload_task(state, runner, path.to_owned());
    }

    #[cfg(not(unix))]
    let _ = config_path;
}

#[cfg(unix)]
mod config_reload;
mod invite_cleanup;
mod invite_counters;
mod rpc_server;
