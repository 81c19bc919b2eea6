use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;

/// A fixed screen position targeted by the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Everything tunable about a run: screen coordinates of the three form
/// controls, timing constants, retry ceiling, checkpoint flush frequency,
/// store paths, and the code-generation ranges.
///
/// Loading a JSON file overrides any subset of fields; the rest keep their
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Substring of the target window's title used for focus detection.
    pub window_title: String,
    pub add_button: Point,
    pub location_field: Point,
    pub confirm_button: Point,

    /// Pause after a click, milliseconds.
    pub action_pause_ms: u64,
    /// Wait for the form to react after focusing the field.
    pub form_wait_ms: u64,
    /// Wait after clicking confirm.
    pub confirm_wait_ms: u64,
    /// Short stabilization pause between input steps.
    pub settle_ms: u64,
    /// Fixed wait backing the assume-success heuristic.
    pub success_wait_ms: u64,

    pub max_attempts: u32,
    /// Base delay for linear backoff between failed attempts.
    pub backoff_base_ms: u64,
    /// Flush the checkpoint after this many successes.
    pub checkpoint_every: usize,

    pub registry_file: PathBuf,
    pub checkpoint_file: PathBuf,
    /// Directory receiving per-failure screen captures.
    pub diagnostics_dir: PathBuf,

    pub prefix: String,
    pub shelf_letters: Vec<char>,
    /// Sub-slots are numbered 1..=this per shelf letter.
    pub sub_slots_per_shelf: u32,
    /// Odd shelf numbers run 1, 3, .. up to and including this bound.
    pub max_odd_shelf: u32,
    /// Even shelf numbers run 2, 4, .. up to and including this bound.
    pub max_even_shelf: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: "DealerNet".to_string(),
            add_button: Point::new(267, 224),
            location_field: Point::new(216, 222),
            confirm_button: Point::new(488, 359),
            action_pause_ms: 100,
            form_wait_ms: 200,
            confirm_wait_ms: 500,
            settle_ms: 100,
            success_wait_ms: 300,
            max_attempts: 3,
            backoff_base_ms: 100,
            checkpoint_every: 10,
            registry_file: PathBuf::from("registered_locations.txt"),
            checkpoint_file: PathBuf::from("run_progress.txt"),
            diagnostics_dir: PathBuf::from("diagnostics"),
            prefix: "FA01".to_string(),
            shelf_letters: vec!['A', 'B', 'C', 'D', 'E', 'F'],
            sub_slots_per_shelf: 10,
            max_odd_shelf: 29,
            max_even_shelf: 18,
        }
    }
}

impl Config {
    /// Loads a config from a JSON file; missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            RegistryError::ConfigInvalid(format!("{}: {e}", path.display()))
        })
    }

    /// Static sanity checks, independent of the display.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.max_attempts == 0 {
            return Err(RegistryError::ConfigInvalid(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.checkpoint_every == 0 {
            return Err(RegistryError::ConfigInvalid(
                "checkpoint_every must be at least 1".to_string(),
            ));
        }
        if self.prefix.trim().is_empty() {
            return Err(RegistryError::ConfigInvalid(
                "prefix must not be empty".to_string(),
            ));
        }
        if self.shelf_letters.is_empty() {
            return Err(RegistryError::ConfigInvalid(
                "shelf_letters must not be empty".to_string(),
            ));
        }
        if self.sub_slots_per_shelf == 0 {
            return Err(RegistryError::ConfigInvalid(
                "sub_slots_per_shelf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Checks the three control coordinates against the live display bounds.
    pub fn validate_coordinates(&self, screen: (u32, u32)) -> Result<(), RegistryError> {
        let (width, height) = screen;
        for (name, point) in [
            ("add_button", self.add_button),
            ("location_field", self.location_field),
            ("confirm_button", self.confirm_button),
        ] {
            if point.x >= width || point.y >= height {
                return Err(RegistryError::ConfigInvalid(format!(
                    "{name} at ({}, {}) is outside the {width}x{height} display",
                    point.x, point.y
                )));
            }
        }
        Ok(())
    }
}
