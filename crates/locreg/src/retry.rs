use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::actuator::{Actuator, Confirmation};
use crate::errors::RegistryError;
use crate::normalize::normalize;
use crate::store::{CanonicalSet, RegistryStore};

/// What one `attempt_with_retry` call did, as an explicit status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Registered and persisted by this call.
    Success,
    /// Already in the canonical set; no actuator call was made (or the
    /// external system reported it as a duplicate).
    AlreadyRegistered,
    /// Attempts exhausted or the result unconfirmable; persisted as
    /// accounted-for anyway.
    Exhausted,
    /// Cancellation observed; no further side effects.
    Cancelled,
}

/// Wraps one item's registration in bounded retries with linear backoff.
///
/// An item that cannot be confirmed after the retry ceiling is still
/// appended to the registry: with no way to query the external system,
/// forward progress beats certainty, and a stuck item must not stall the
/// whole run.
pub struct RetryEngine {
    store: RegistryStore,
    cancel: CancellationToken,
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryEngine {
    pub fn new(
        store: RegistryStore,
        cancel: CancellationToken,
        max_attempts: u32,
        backoff_base: Duration,
    ) -> Self {
        Self {
            store,
            cancel,
            max_attempts,
            backoff_base,
        }
    }

    pub async fn attempt_with_retry(
        &self,
        actuator: &dyn Actuator,
        code: &str,
        set: &mut CanonicalSet,
    ) -> Outcome {
        if set.contains(&normalize(code)) {
            debug!("'{code}' already registered, skipping");
            return Outcome::AlreadyRegistered;
        }

        for attempt in 1..=self.max_attempts {
            if self.cancel.is_cancelled() {
                return Outcome::Cancelled;
            }
            match actuator.register(code).await {
                Ok(Confirmation::Confirmed) => {
                    self.store.append(code, set);
                    return Outcome::Success;
                }
                Ok(Confirmation::Unconfirmed) => {
                    // Unconfirmed is treated like exhaustion: recorded as
                    // accounted-for, not counted as a success.
                    warn!("'{code}' unconfirmed, recording it as registered anyway");
                    self.store.append(code, set);
                    return Outcome::Exhausted;
                }
                Err(RegistryError::Cancelled) => return Outcome::Cancelled,
                Err(err) => {
                    if is_duplicate_hint(&err) {
                        info!("external system reports '{code}' as existing, recording it");
                        self.store.append(code, set);
                        return Outcome::AlreadyRegistered;
                    }
                    warn!(
                        "attempt {attempt}/{} failed for '{code}': {err}, backing off",
                        self.max_attempts
                    );
                    sleep(self.backoff_base * attempt).await;
                }
            }
        }

        error!(
            "giving up on '{code}' after {} attempts, recording it as registered",
            self.max_attempts
        );
        self.store.append(code, set);
        Outcome::Exhausted
    }
}

/// The external system surfaces duplicates only as free-text fault messages.
fn is_duplicate_hint(err: &RegistryError) -> bool {
    match err {
        RegistryError::ActuatorFault(message) => {
            let message = message.to_lowercase();
            message.contains("already registered") || message.contains("duplicate")
        }
        _ => false,
    }
}
