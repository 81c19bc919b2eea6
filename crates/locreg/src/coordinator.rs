use std::collections::HashSet;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::actuator::Actuator;
use crate::checkpoint::CheckpointStore;
use crate::config::Config;
use crate::errors::RegistryError;
use crate::generator::generate_all;
use crate::normalize::normalize;
use crate::retry::{Outcome, RetryEngine};
use crate::store::RegistryStore;

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// The work list was drained; the checkpoint was deleted.
    Finished,
    /// Cancellation was observed; the checkpoint was left in place for
    /// resume.
    Cancelled,
}

/// Counters handed back to the caller when a run reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub state: RunState,
    /// Size of the delta work list this run started with.
    pub planned: usize,
    pub registered: usize,
    pub already_registered: usize,
    pub exhausted: usize,
}

/// Drives a whole run: prepare (validate, back up, load, diff), iterate the
/// work list through the retry engine, checkpoint every K successes, drain
/// on cancellation or exhaustion, and finish.
///
/// Single logical worker; the external system is a single-focus UI target
/// and cannot take concurrent input.
pub struct RunCoordinator {
    config: Config,
    store: RegistryStore,
    checkpoint: CheckpointStore,
    cancel: CancellationToken,
}

impl RunCoordinator {
    pub fn new(config: Config, cancel: CancellationToken) -> Self {
        let store = RegistryStore::new(&config.registry_file);
        let checkpoint = CheckpointStore::new(&config.checkpoint_file);
        Self {
            config,
            store,
            checkpoint,
            cancel,
        }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub async fn run(&self, actuator: &dyn Actuator) -> Result<RunReport, RegistryError> {
        info!("preparing run");
        self.config.validate()?;
        actuator.preflight()?;
        self.store.backup()?;

        let (mut canonical, _) = self.store.load();
        let in_flight: HashSet<String> = self
            .checkpoint
            .load()
            .iter()
            .map(|line| normalize(line))
            .collect();
        if !in_flight.is_empty() {
            info!(
                "resuming: {} items from a previous interrupted run are treated as handled",
                in_flight.len()
            );
        }

        let space = generate_all(&self.config);
        let total = space.len();
        let todo: Vec<String> = space
            .into_iter()
            .filter(|code| {
                let key = normalize(code);
                !canonical.contains(&key) && !in_flight.contains(&key)
            })
            .collect();
        info!("{} of {total} locations still to register", todo.len());

        if todo.is_empty() {
            // Nothing was iterated, so the checkpoint (if any) stays: its
            // entries may not have reached the registry log yet.
            info!("nothing to do, finishing");
            return Ok(RunReport {
                state: RunState::Finished,
                planned: 0,
                registered: 0,
                already_registered: 0,
                exhausted: 0,
            });
        }

        let engine = RetryEngine::new(
            self.store.clone(),
            self.cancel.clone(),
            self.config.max_attempts,
            Duration::from_millis(self.config.backoff_base_ms),
        );

        info!("running");
        let mut report = RunReport {
            state: RunState::Finished,
            planned: todo.len(),
            registered: 0,
            already_registered: 0,
            exhausted: 0,
        };
        let mut registered_this_run: Vec<String> = Vec::new();

        for (index, code) in todo.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!("cancellation requested, stopping before the next item");
                break;
            }
            info!("registering {}/{}: {code}", index + 1, todo.len());
            match engine
                .attempt_with_retry(actuator, code, &mut canonical)
                .await
            {
                Outcome::Success => {
                    registered_this_run.push(code.clone());
                    report.registered += 1;
                    if registered_this_run.len() % self.config.checkpoint_every == 0 {
                        self.checkpoint.save(&registered_this_run);
                    }
                }
                Outcome::AlreadyRegistered => report.already_registered += 1,
                Outcome::Exhausted => report.exhausted += 1,
                Outcome::Cancelled => break,
            }
        }

        // Draining: flush whatever accumulated, covering a partial final
        // batch.
        info!("draining, flushing checkpoint");
        self.checkpoint.save(&registered_this_run);

        if self.cancel.is_cancelled() {
            warn!(
                "run cancelled after {} registrations, checkpoint kept for resume",
                report.registered
            );
            report.state = RunState::Cancelled;
        } else {
            self.checkpoint.clear();
            info!("run finished, {} registrations", report.registered);
        }
        Ok(report)
    }
}
