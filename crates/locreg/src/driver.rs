use async_trait::async_trait;

use crate::config::Point;
use crate::errors::RegistryError;

/// The seam to the physical input/screen layer.
///
/// Everything above this trait is platform independent; a real backend wires
/// these calls to OS-level input synthesis and window queries, while tests
/// and dry runs substitute lightweight fakes.
#[async_trait]
pub trait InputDriver: Send + Sync {
    /// Current display bounds, used to validate configured coordinates.
    fn screen_size(&self) -> (u32, u32);

    async fn click(&self, point: Point) -> Result<(), RegistryError>;

    async fn move_to(&self, point: Point) -> Result<(), RegistryError>;

    async fn type_text(&self, text: &str) -> Result<(), RegistryError>;

    /// Select-all plus delete on the currently focused field.
    async fn clear_focused_field(&self) -> Result<(), RegistryError>;

    /// Title of the foreground window, if any.
    async fn focused_window_title(&self) -> Result<Option<String>, RegistryError>;

    /// Brings the window whose title contains `title_fragment` to the
    /// foreground.
    async fn focus_window(&self, title_fragment: &str) -> Result<(), RegistryError>;

    /// Captures the screen as an encoded image, for failure diagnostics.
    async fn capture_screen(&self) -> Result<Vec<u8>, RegistryError>;

    /// Polled by the cancel-key observer. Keypress detection itself is the
    /// backend's concern.
    fn cancel_key_pressed(&self) -> bool;
}
