use async_trait::async_trait;
use locreg::{InputDriver, Point, RegistryError};
use tracing::info;

/// Input driver that logs every action instead of performing it.
///
/// Used when no platform backend is compiled in; it lets a run be rehearsed
/// end to end (filtering, retries, checkpointing) without touching any UI.
/// Cancel-key detection is a platform backend's concern, so here the key is
/// never pressed and Ctrl+C is the only live trigger.
pub struct DryRunDriver {
    window_title: String,
}

impl DryRunDriver {
    pub fn new(window_title: String) -> Self {
        Self { window_title }
    }
}

#[async_trait]
impl InputDriver for DryRunDriver {
    fn screen_size(&self) -> (u32, u32) {
        (1920, 1080)
    }

    async fn click(&self, point: Point) -> Result<(), RegistryError> {
        info!("[dry-run] click at ({}, {})", point.x, point.y);
        Ok(())
    }

    async fn move_to(&self, point: Point) -> Result<(), RegistryError> {
        info!("[dry-run] move to ({}, {})", point.x, point.y);
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), RegistryError> {
        info!("[dry-run] type '{text}'");
        Ok(())
    }

    async fn clear_focused_field(&self) -> Result<(), RegistryError> {
        info!("[dry-run] clear focused field");
        Ok(())
    }

    async fn focused_window_title(&self) -> Result<Option<String>, RegistryError> {
        Ok(Some(self.window_title.clone()))
    }

    async fn focus_window(&self, _title_fragment: &str) -> Result<(), RegistryError> {
        Ok(())
    }

    async fn capture_screen(&self) -> Result<Vec<u8>, RegistryError> {
        Ok(Vec::new())
    }

    fn cancel_key_pressed(&self) -> bool {
        false
    }
}
