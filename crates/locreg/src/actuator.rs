use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::driver::InputDriver;
use crate::errors::RegistryError;

/// What a single attempt reported about the external system's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    /// The attempt completed but the confirmation check did not vouch for it.
    Unconfirmed,
}

/// One call = one physical attempt to register a single code.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// One-time check before a run starts; must not touch the external
    /// system.
    fn preflight(&self) -> Result<(), RegistryError>;

    async fn register(&self, code: &str) -> Result<Confirmation, RegistryError>;
}

/// Pluggable success check consulted after the settle wait.
///
/// The external system has no query API, so the shipped default is a
/// heuristic; a real check can replace it without touching the retry engine.
pub trait ConfirmStrategy: Send + Sync {
    fn confirm(&self, code: &str) -> bool;
}

/// Fixed-wait heuristic: assumes the submission landed once the settle
/// interval has passed. Known limitation, not an acknowledgment.
pub struct AssumeSuccess;

impl ConfirmStrategy for AssumeSuccess {
    fn confirm(&self, _code: &str) -> bool {
        true
    }
}

/// Drives the three-control registration form through an [`InputDriver`]:
/// verify focus, clear stale input, add, type the code, confirm, settle.
pub struct UiActuator {
    driver: Arc<dyn InputDriver>,
    config: Config,
    confirm: Arc<dyn ConfirmStrategy>,
    cancel: CancellationToken,
}

impl UiActuator {
    pub fn new(
        driver: Arc<dyn InputDriver>,
        config: Config,
        confirm: Arc<dyn ConfirmStrategy>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            driver,
            config,
            confirm,
            cancel,
        }
    }

    async fn pause(&self, ms: u64) {
        sleep(Duration::from_millis(ms)).await;
    }

    /// Checks the target window is foregrounded, restoring focus once if
    /// not. A failed restore fails the attempt.
    async fn ensure_focus(&self) -> Result<(), RegistryError> {
        let title = self.driver.focused_window_title().await?;
        if title
            .as_deref()
            .is_some_and(|t| t.contains(&self.config.window_title))
        {
            return Ok(());
        }
        warn!(
            "'{}' is not in focus, attempting to bring it to the foreground",
            self.config.window_title
        );
        self.driver
            .focus_window(&self.config.window_title)
            .await
            .map_err(|e| {
                RegistryError::FocusLost(format!(
                    "could not restore focus to '{}': {e}",
                    self.config.window_title
                ))
            })?;
        self.pause(self.config.form_wait_ms).await;
        Ok(())
    }

    async fn drive_form(&self, code: &str) -> Result<(), RegistryError> {
        self.ensure_focus().await?;

        // Clear whatever a previous attempt may have left in the field.
        self.driver.click(self.config.location_field).await?;
        self.driver.clear_focused_field().await?;
        self.pause(self.config.settle_ms).await;

        debug!("clicking add button");
        self.driver.click(self.config.add_button).await?;
        self.pause(self.config.action_pause_ms).await;

        debug!("entering '{code}'");
        self.driver.click(self.config.location_field).await?;
        self.pause(self.config.form_wait_ms).await;
        self.driver.clear_focused_field().await?;
        self.pause(self.config.settle_ms).await;
        self.driver.type_text(code).await?;
        self.pause(self.config.settle_ms * 2).await;

        // Park the pointer away from the field so it cannot obscure the form.
        self.driver.move_to(self.config.add_button).await?;

        debug!("clicking confirm");
        self.driver.click(self.config.confirm_button).await?;
        self.pause(self.config.confirm_wait_ms).await;
        Ok(())
    }

    /// Saves a screen capture tagged with the code and a timestamp so a
    /// failed attempt can be debugged offline.
    async fn capture_diagnostic(&self, code: &str, failure: &RegistryError) {
        let capture = match self.driver.capture_screen().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("attempt failed for '{code}': {failure}; screen capture also failed: {e}");
                return;
            }
        };
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let file_name = format!("fail_{}_{stamp}.png", code.replace(' ', "_"));
        let path = self.config.diagnostics_dir.join(file_name);
        let written = std::fs::create_dir_all(&self.config.diagnostics_dir)
            .and_then(|()| std::fs::write(&path, &capture));
        match written {
            Ok(()) => error!(
                "attempt failed for '{code}': {failure}; capture saved to {}",
                path.display()
            ),
            Err(e) => {
                error!("attempt failed for '{code}': {failure}; could not save capture: {e}")
            }
        }
    }
}

#[async_trait]
impl Actuator for UiActuator {
    fn preflight(&self) -> Result<(), RegistryError> {
        self.config.validate_coordinates(self.driver.screen_size())
    }

    async fn register(&self, code: &str) -> Result<Confirmation, RegistryError> {
        if self.cancel.is_cancelled() {
            return Err(RegistryError::Cancelled);
        }
        match self.drive_form(code).await {
            Ok(()) => {
                self.pause(self.config.success_wait_ms).await;
                let confirmed = self.confirm.confirm(code);
                // Park back over the add button for the next item.
                let _ = self.driver.move_to(self.config.add_button).await;
                if confirmed {
                    Ok(Confirmation::Confirmed)
                } else {
                    warn!("no confirmation observed for '{code}'");
                    Ok(Confirmation::Unconfirmed)
                }
            }
            Err(err) => {
                self.capture_diagnostic(code, &err).await;
                let _ = self.driver.move_to(self.config.add_button).await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Point;
    use std::sync::Mutex;

    struct MockDriver {
        focused: Mutex<Option<String>>,
        can_restore_focus: bool,
        actions: Mutex<Vec<String>>,
    }

    impl MockDriver {
        fn focused_on(title: &str) -> Self {
            Self {
                focused: Mutex::new(Some(title.to_string())),
                can_restore_focus: true,
                actions: Mutex::new(Vec::new()),
            }
        }

        fn unfocusable() -> Self {
            Self {
                focused: Mutex::new(None),
                can_restore_focus: false,
                actions: Mutex::new(Vec::new()),
            }
        }

        fn actions(&self) -> Vec<String> {
            self.actions.lock().unwrap().clone()
        }

        fn record(&self, action: String) {
            self.actions.lock().unwrap().push(action);
        }
    }

    #[async_trait]
    impl InputDriver for MockDriver {
        fn screen_size(&self) -> (u32, u32) {
            (800, 600)
        }

        async fn click(&self, point: Point) -> Result<(), RegistryError> {
            self.record(format!("click {},{}", point.x, point.y));
            Ok(())
        }

        async fn move_to(&self, point: Point) -> Result<(), RegistryError> {
            self.record(format!("move {},{}", point.x, point.y));
            Ok(())
        }

        async fn type_text(&self, text: &str) -> Result<(), RegistryError> {
            self.record(format!("type {text}"));
            Ok(())
        }

        async fn clear_focused_field(&self) -> Result<(), RegistryError> {
            self.record("clear".to_string());
            Ok(())
        }

        async fn focused_window_title(&self) -> Result<Option<String>, RegistryError> {
            Ok(self.focused.lock().unwrap().clone())
        }

        async fn focus_window(&self, title_fragment: &str) -> Result<(), RegistryError> {
            if self.can_restore_focus {
                *self.focused.lock().unwrap() = Some(title_fragment.to_string());
                Ok(())
            } else {
                Err(RegistryError::ActuatorFault("window not found".to_string()))
            }
        }

        async fn capture_screen(&self) -> Result<Vec<u8>, RegistryError> {
            Ok(vec![0u8; 8])
        }

        fn cancel_key_pressed(&self) -> bool {
            false
        }
    }

    fn fast_config(dir: &tempfile::TempDir) -> Config {
        Config {
            action_pause_ms: 0,
            form_wait_ms: 0,
            confirm_wait_ms: 0,
            settle_ms: 0,
            success_wait_ms: 0,
            diagnostics_dir: dir.path().join("diagnostics"),
            registry_file: dir.path().join("registered.txt"),
            checkpoint_file: dir.path().join("progress.txt"),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn happy_path_types_the_code_and_confirms() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(MockDriver::focused_on("DealerNet - Estoque"));
        let actuator = UiActuator::new(
            driver.clone(),
            fast_config(&dir),
            Arc::new(AssumeSuccess),
            CancellationToken::new(),
        );

        let outcome = actuator.register("FA01 01 A01").await.unwrap();
        assert_eq!(outcome, Confirmation::Confirmed);

        let actions = driver.actions();
        assert!(actions.contains(&"type FA01 01 A01".to_string()));
        assert!(actions.contains(&"click 488,359".to_string()), "{actions:?}");
    }

    #[tokio::test]
    async fn unrestorable_focus_fails_with_diagnostic_capture() {
        let dir = tempfile::tempdir().unwrap();
        let config = fast_config(&dir);
        let actuator = UiActuator::new(
            Arc::new(MockDriver::unfocusable()),
            config.clone(),
            Arc::new(AssumeSuccess),
            CancellationToken::new(),
        );

        let err = actuator.register("FA01 01 A01").await.unwrap_err();
        assert!(matches!(err, RegistryError::FocusLost(_)));

        let captures: Vec<_> = std::fs::read_dir(&config.diagnostics_dir)
            .unwrap()
            .collect();
        assert_eq!(captures.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_token_skips_all_input() {
        let dir = tempfile::tempdir().unwrap();
        let driver = Arc::new(MockDriver::focused_on("DealerNet"));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let actuator = UiActuator::new(
            driver.clone(),
            fast_config(&dir),
            Arc::new(AssumeSuccess),
            cancel,
        );

        let err = actuator.register("FA01 01 A01").await.unwrap_err();
        assert!(matches!(err, RegistryError::Cancelled));
        assert!(driver.actions().is_empty());
    }

    #[tokio::test]
    async fn negative_confirmation_is_reported_as_unconfirmed() {
        struct NeverConfirm;
        impl ConfirmStrategy for NeverConfirm {
            fn confirm(&self, _code: &str) -> bool {
                false
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let actuator = UiActuator::new(
            Arc::new(MockDriver::focused_on("DealerNet")),
            fast_config(&dir),
            Arc::new(NeverConfirm),
            CancellationToken::new(),
        );

        let outcome = actuator.register("FA01 01 A01").await.unwrap();
        assert_eq!(outcome, Confirmation::Unconfirmed);
    }

    #[test]
    fn preflight_rejects_coordinates_outside_the_display() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            confirm_button: Point::new(1000, 900),
            ..fast_config(&dir)
        };
        let actuator = UiActuator::new(
            Arc::new(MockDriver::focused_on("DealerNet")),
            config,
            Arc::new(AssumeSuccess),
            CancellationToken::new(),
        );
        assert!(matches!(
            actuator.preflight(),
            Err(RegistryError::ConfigInvalid(_))
        ));
    }
}
