use std::path::PathBuf;

use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{Layer, Subscriber},
    layer::SubscriberExt,
};

fn create_filter(verbose: Option<u8>) -> anyhow::Result<EnvFilter> {
    #[allow(clippy::wildcard_in_or_patterns)]
    let level_filter = match verbose {
        None | Some(0) => LevelFilter::INFO,
        Some(1) => LevelFilter::DEBUG,
        Some(2) | _ => LevelFilter::TRACE,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level_filter.into());

    // the change feed listener is chatty, only show it at full verbosity
    if verbose.unwrap_or(0) < 3 {
        filter = filter.add_directive("dayof::tasks::invite_counters=debug".parse()?);
    }

    Ok(filter)
}

/// Builds the global subscriber. With a log directory, logs are also written to
/// daily-rotated files there, and the returned guard must be held until shutdown
/// so buffered lines get flushed.
pub fn generate(verbose: Option<u8>, dir: Option<PathBuf>) -> anyhow::Result<(Dispatch, Option<WorkerGuard>)> {
    let filter = create_filter(verbose)?;

    Ok(match dir {
        None => (
            Dispatch::new(Subscriber::builder().with_env_filter(filter).with_writer(std::io::stdout).finish()),
            None,
        ),
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "dayof.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_logger = Layer::new().with_writer(non_blocking).with_ansi(false);
            let stdout_logger = Layer::new().with_writer(std::io::stdout);

            let collector = tracing_subscriber::registry().with(filter).with(file_logger).with(stdout_logger);

            (Dispatch::new(collector), Some(guard))
        }
    })
}
