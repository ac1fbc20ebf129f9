#![allow(clippy::redundant_pattern_matching, clippy::identity_op, clippy::redundant_closure)]
#![deny(deprecated)]

extern crate tracing as log;

use std::sync::Arc;

pub mod cli;
pub mod config;
pub mod error;
pub mod internal;
pub mod rpc;
pub mod state;
pub mod tasks;

#[cfg(test)]
pub mod testing;

pub mod prelude {
    pub use crate::error::Error;
    pub use crate::state::ServerState;

    pub use db::Store;

    pub use rpc::{error::Error as CommonError, Authorization};
    pub use schema::{aliases::*, SmolStr, Timestamp};

    pub use crate::config::Config;
    pub use config::HasConfig;
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = cli::CliOptions::parse()?;

    // a .env file is optional
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    // temporary logger until info needed for global logger is loaded
    let (dispatch, _) = common::logging::generate(args.verbose, None)?;
    let _log_guard = log::dispatcher::set_default(&dispatch);

    log::debug!("Arguments: {:?}", args);

    let local: config::Config = match args.config {
        Some(ref path) => {
            log::info!("Loading config from {}", path.display());
            ::config::load(path).await?
        }
        None => {
            let mut local = config::Config::default();
            ::config::Configuration::configure(&mut local);
            local
        }
    };

    let log_dir = match local.paths.log_dir.as_os_str().is_empty() {
        true => None,
        false => {
            log::info!("Setting up log-file rotation in {}", local.paths.log_dir.display());
            Some(local.paths.log_dir.clone())
        }
    };

    // setup full logger
    drop(_log_guard);

    let (dispatch, _log_guard) = common::logging::generate(args.verbose, log_dir)?;
    log::dispatcher::set_global_default(dispatch)?;

    let mailer = email::LogMailer::new(local.email.from.as_str())?;
    let db = db::MemoryStore::new();

    let state = state::ServerState::new(local, Arc::new(db), Arc::new(mailer));

    log::info!("Starting tasks...");
    let runner = tasks::TaskRunner::default();
    tasks::add_tasks(&state, &runner, args.config.as_deref());

    log::trace!("Setting up shutdown signal for Ctrl+C");
    let shutdown = runner.signal();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown.stop();
    });

    runner.wait().await?;

    println!("Flushing logs...");
    drop(_log_guard);
    println!("Goodbye.");

    Ok(())
}
