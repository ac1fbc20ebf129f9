use db::Change;
use tokio::sync::broadcast::error::RecvError;

use crate::internal::invite_counters::update_event_invite_stats;

use super::*;

/// Keeps each event's denormalized invite counters in step with its invites,
/// driven by the store's change feed.
pub fn add_invite_counters_task(state: &ServerState, runner: &TaskRunner) {
    runner.add(task_runner::fn_task(state.clone(), |mut alive, state| async move {
        let mut changes = state.db.subscribe();

        loop {
            let change = tokio::select! {
                biased;
                _ = alive.changed() => break,
                change = changes.recv() => change,
            };

            match change {
                Ok(Change::Invites { event_id }) => update_event_invite_stats(&state, &event_id).await,
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Invite counter listener lagged behind, skipped {skipped} changes");
                }
                Err(RecvError::Closed) => break,
            }
        }

        log::debug!("Invite counter listener stopped");
    }));
}
