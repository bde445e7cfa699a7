//! Command execution layer.
//!
//! Translates data-fetching [`Effect`]s into spawned API calls. Each call
//! resolves to an [`ExecOutcome`] that the runtime feeds back into
//! `App::update` as `Msg::ExecCompleted`. State stays pure in [`crate::app`];
//! every network side effect crosses this boundary.

use mims_types::{Effect, ExecOutcome};
use tokio::task::JoinHandle;

use crate::app::App;

/// Execute the data-fetching effects in `effects`, spawning one background
/// task per request. Navigation effects are handled by the runtime before
/// this is called; anything unrecognized here is ignored.
///
/// Loading flags and request sequences are stamped synchronously, before the
/// spawn, so a render between issue and completion already shows the
/// throbber and stale completions can be told apart.
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> Vec<JoinHandle<ExecOutcome>> {
    let mut pending = Vec::new();
    for effect in effects {
        match effect {
            Effect::ReloadTable(id) => {
                let table = app.table_mut(id);
                table.cancel_debounce();
                let seq = table.begin_load();
                let query = table.to_query();
                let endpoint = table.endpoint;
                let client = app.ctx.client.clone();
                pending.push(tokio::spawn(async move {
                    match client.fetch_list(endpoint, &query).await {
                        Ok(page) => ExecOutcome::ListLoaded { table: id, seq, page },
                        Err(error) => ExecOutcome::ListFailed {
                            table: id,
                            seq,
                            message: error.summary(),
                        },
                    }
                }));
            }
            Effect::LoadDashboard => {
                app.dashboard.begin_load();
                let client = app.ctx.client.clone();
                pending.push(tokio::spawn(async move {
                    match client.dashboard_stats().await {
                        Ok(stats) => ExecOutcome::StatsLoaded(Box::new(stats)),
                        Err(error) => ExecOutcome::StatsFailed(error.summary()),
                    }
                }));
            }
            Effect::LoadBranches => {
                let client = app.ctx.client.clone();
                pending.push(tokio::spawn(async move {
                    match client.branches().await {
                        Ok(branches) => ExecOutcome::BranchesLoaded(branches),
                        Err(error) => ExecOutcome::BranchesFailed(error.summary()),
                    }
                }));
            }
            Effect::SubmitAction { path, body, refresh } => {
                let client = app.ctx.client.clone();
                pending.push(tokio::spawn(async move {
                    match client.submit_action(&path, body.as_ref()).await {
                        Ok(envelope) if envelope.success => ExecOutcome::ActionCompleted {
                            message: envelope.message.unwrap_or_else(|| "Done".into()),
                            refresh,
                        },
                        Ok(envelope) => {
                            ExecOutcome::ActionFailed(envelope.message.unwrap_or_else(|| "Action failed".into()))
                        }
                        Err(error) => ExecOutcome::ActionFailed(error.summary()),
                    }
                }));
            }
            _ => {}
        }
    }
    pending
}
