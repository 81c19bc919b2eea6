use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::errors::RegistryError;
use crate::normalize::normalize;

/// Set of normalized codes; the single source of truth for "already
/// registered". Grows monotonically, never shrinks.
pub type CanonicalSet = HashSet<String>;

/// Append-only log of every confirmed (or accounted-for) registration, one
/// raw line per code. The canonical set is derived from it at load time by
/// normalizing each line.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the log into a canonical set plus the original raw lines.
    ///
    /// Fails soft: a missing file or a read error yields empty state so the
    /// run can still proceed and attempt registration.
    pub fn load(&self) -> (CanonicalSet, Vec<String>) {
        match fs::read_to_string(&self.path) {
            Ok(data) => {
                let lines: Vec<String> = data
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect();
                let set: CanonicalSet = lines.iter().map(|line| normalize(line)).collect();
                info!(
                    "loaded {} registered locations from {}",
                    set.len(),
                    self.path.display()
                );
                (set, lines)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "no registry file at {}, starting from an empty set",
                    self.path.display()
                );
                (CanonicalSet::new(), Vec::new())
            }
            Err(e) => {
                error!("failed to read {}: {e}", self.path.display());
                (CanonicalSet::new(), Vec::new())
            }
        }
    }

    /// Records one registration: appends the raw line and inserts the
    /// normalized form. No-op when the code is already present. This is the
    /// only mutator of the canonical set's membership.
    ///
    /// Write errors are logged and swallowed; the in-memory set is only
    /// updated when the line actually reached the file.
    pub fn append(&self, raw: &str, set: &mut CanonicalSet) {
        let key = normalize(raw);
        if set.contains(&key) {
            warn!("location '{raw}' already recorded, skipping write");
            return;
        }
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{raw}"));
        match result {
            Ok(()) => {
                set.insert(key);
                info!("recorded location '{raw}'");
            }
            Err(e) => error!("failed to record '{raw}' in {}: {e}", self.path.display()),
        }
    }

    /// Takes a non-destructive `.bak` copy of the log if it exists.
    ///
    /// Unlike reads and appends this propagates failure: starting a run
    /// without a backup of the only authoritative record is not acceptable.
    pub fn backup(&self) -> Result<(), RegistryError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut backup_path = self.path.as_os_str().to_os_string();
        backup_path.push(".bak");
        let backup_path = PathBuf::from(backup_path);
        fs::copy(&self.path, &backup_path)?;
        info!("backed up registry to {}", backup_path.display());
        Ok(())
    }
}
