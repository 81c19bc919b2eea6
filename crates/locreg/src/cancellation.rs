//! Cooperative cancellation wiring.
//!
//! One [`CancellationToken`] per run, set by either of two independent
//! triggers: the process interrupt signal, or a dedicated cancel key polled
//! through the input driver. The flag is monotonic for the run; coordinator
//! and retry engine observe it at item and retry boundaries only, never
//! mid-attempt.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::driver::InputDriver;

/// Cancels the token when the process receives an interrupt (Ctrl+C).
pub fn spawn_ctrl_c_handler(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, cancelling run");
                cancel.cancel();
            }
            Err(e) => warn!("could not listen for interrupt signal: {e}"),
        }
    })
}

/// Polls the driver's cancel-key state and cancels the token on the first
/// press. Exits once the token is set by anyone.
pub fn spawn_cancel_key_observer(
    driver: Arc<dyn InputDriver>,
    cancel: CancellationToken,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            if driver.cancel_key_pressed() {
                info!("cancel key pressed, draining run");
                cancel.cancel();
                break;
            }
            tokio::time::sleep(poll_interval).await;
        }
    })
}
