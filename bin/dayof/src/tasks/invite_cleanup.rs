use util::time::until_next_hour_of_day;

use super::*;

const DAY: Duration = Duration::from_secs(60 * 60 * 24);

/// Sweeps expired invites once a day, at the configured hour (UTC).
pub fn add_invite_cleanup_task(state: &ServerState, runner: &TaskRunner) {
    let cleanup_hour = state.config().tasks.cleanup_hour;
    let delay = until_next_hour_of_day(Timestamp::now_utc(), cleanup_hour);

    log::debug!("First invite cleanup in {}s", delay.as_secs());

    runner.add(task_runner::delayed_interval_fn_task(state.clone(), delay, DAY, |_, state| {
        let state = state.clone();

        async move {
            log::trace!("Cleaning up expired invites");

            crate::internal::invite_cleanup::cleanup_expired_invites(state).await;
        }
    }));
}
