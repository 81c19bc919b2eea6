#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use locreg::{Actuator, Confirmation, Config, RegistryError};
use tokio_util::sync::CancellationToken;

/// Scripted stand-in for the UI actuator: records every call, fails the
/// codes it is told to, and can trip a cancellation token from inside an
/// attempt.
#[derive(Default)]
pub struct MockActuator {
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
    pub cancel_after: Option<(CancellationToken, usize)>,
}

impl MockActuator {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing_on(code: &str) -> Self {
        Self {
            failing: HashSet::from([code.to_string()]),
            ..Self::default()
        }
    }

    pub fn cancelling(token: CancellationToken) -> Self {
        Self::cancelling_after(token, 1)
    }

    /// Trips the token from inside the `calls`-th attempt.
    pub fn cancelling_after(token: CancellationToken, calls: usize) -> Self {
        Self {
            cancel_after: Some((token, calls)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, code: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == code).count()
    }
}

#[async_trait]
impl Actuator for MockActuator {
    fn preflight(&self) -> Result<(), RegistryError> {
        Ok(())
    }

    async fn register(&self, code: &str) -> Result<Confirmation, RegistryError> {
        let call_count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(code.to_string());
            calls.len()
        };
        if let Some((token, threshold)) = &self.cancel_after {
            if call_count >= *threshold {
                token.cancel();
            }
        }
        if self.failing.contains(code) {
            return Err(RegistryError::ActuatorFault(
                "form did not respond".to_string(),
            ));
        }
        Ok(Confirmation::Confirmed)
    }
}

/// Config whose generated space is exactly `["FA01 01 A01", "FA01 01 A02"]`,
/// with all waits zeroed and stores rooted in `dir`.
pub fn two_code_config(dir: &Path) -> Config {
    Config {
        shelf_letters: vec!['A'],
        sub_slots_per_shelf: 2,
        max_odd_shelf: 1,
        max_even_shelf: 0,
        action_pause_ms: 0,
        form_wait_ms: 0,
        confirm_wait_ms: 0,
        settle_ms: 0,
        success_wait_ms: 0,
        backoff_base_ms: 0,
        checkpoint_every: 1,
        registry_file: dir.join("registered.txt"),
        checkpoint_file: dir.join("progress.txt"),
        diagnostics_dir: dir.join("diagnostics"),
        ..Config::default()
    }
}

pub fn registry_lines(config: &Config) -> Vec<String> {
    match std::fs::read_to_string(&config.registry_file) {
        Ok(data) => data.lines().map(String::from).collect(),
        Err(_) => Vec::new(),
    }
}
