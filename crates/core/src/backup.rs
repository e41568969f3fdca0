//! Timestamped snapshots of the data directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Prefix of every snapshot directory name.
pub const BACKUP_PREFIX: &str = "backup_";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Outcome of a snapshot that ran.
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Directory the snapshot was written to.
    pub directory: PathBuf,
    /// Destination paths of every file copied.
    pub copied: Vec<PathBuf>,
    /// Source files that could not be copied, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

impl BackupReport {
    /// True when every file was copied.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Copies the top level of a source directory into `backup_<timestamp>` folders.
#[derive(Debug, Clone)]
pub struct BackupService {
    source: PathBuf,
    destination_root: PathBuf,
}

impl BackupService {
    /// Create a service copying from `source` into snapshots under `destination_root`.
    pub fn new(source: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination_root: destination_root.into(),
        }
    }

    /// Directory snapshots are written under.
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Snapshot the source using the current local time.
    pub fn perform_backup(&self) -> Result<Option<BackupReport>> {
        self.perform_backup_at(Local::now())
    }

    /// Snapshot the source into a directory named after `timestamp`.
    ///
    /// Returns `Ok(None)` when the source directory does not exist. Files that
    /// fail to copy are recorded in the report and the remaining files are
    /// still copied; same-named files already in the snapshot are overwritten.
    pub fn perform_backup_at(&self, timestamp: DateTime<Local>) -> Result<Option<BackupReport>> {
        if !self.source.is_dir() {
            warn!(
                "data directory {} does not exist, nothing to back up",
                self.source.display()
            );
            return Ok(None);
        }

        let directory = self.destination_root.join(snapshot_name(timestamp));
        fs::create_dir_all(&directory)
            .with_context(|| format!("failed to create {}", directory.display()))?;

        let mut copied = Vec::new();
        let mut failures = Vec::new();
        let entries = fs::read_dir(&self.source)
            .with_context(|| format!("failed to read {}", self.source.display()))?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("failed to read entry in {}: {err}", self.source.display());
                    continue;
                }
            };
            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            let from = entry.path();
            let to = directory.join(entry.file_name());
            match fs::copy(&from, &to) {
                Ok(_) => copied.push(to),
                Err(err) => {
                    warn!("failed to copy {}: {err}", from.display());
                    failures.push((from, err.to_string()));
                }
            }
        }

        info!(
            files = copied.len(),
            failed = failures.len(),
            "backup written to {}",
            directory.display()
        );
        Ok(Some(BackupReport {
            directory,
            copied,
            failures,
        }))
    }
}

/// Directory name for a snapshot taken at `timestamp`, e.g. `backup_2025-09-25_18-30-00`.
pub fn snapshot_name(timestamp: DateTime<Local>) -> String {
    format!("{BACKUP_PREFIX}{}", timestamp.format(TIMESTAMP_FORMAT))
}

/// Total size in bytes of every regular file below `path`.
///
/// Entries that cannot be read count as zero; a missing root is an error.
pub fn directory_size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }

    let total: u64 = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.metadata().map(|meta| meta.len()).unwrap_or(0))
        .sum();
    Ok(total)
}

/// Convert a byte count to mebibytes for display.
pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
