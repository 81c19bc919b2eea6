use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

/// Rewritable snapshot of the codes registered during the current run, one
/// raw line per code. It is the first line of defense for resume; the
/// registry log is the authoritative one. Absence means no in-flight run.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates and rewrites the checkpoint with the full list. Errors are
    /// logged and swallowed; losing a flush costs at most one batch of
    /// re-attempts on resume.
    pub fn save(&self, items: &[String]) {
        let mut data = String::new();
        for item in items {
            data.push_str(item);
            data.push('\n');
        }
        match fs::write(&self.path, data) {
            Ok(()) => debug!("checkpointed {} items", items.len()),
            Err(e) => error!("failed to write checkpoint {}: {e}", self.path.display()),
        }
    }

    /// Returns the checkpointed lines, or empty when absent or unreadable.
    pub fn load(&self) -> Vec<String> {
        match fs::read_to_string(&self.path) {
            Ok(data) => data
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                error!("failed to read checkpoint {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Deletes the checkpoint file. Only called on a clean, non-cancelled
    /// completion.
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!("cleared checkpoint {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => error!("failed to clear checkpoint {}: {e}", self.path.display()),
        }
    }
}
