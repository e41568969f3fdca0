//! Application configuration.
//!
//! Values are layered: built-in defaults, then `~/.config/ccrm/config.toml`
//! (if present), then `CCRM_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Directory under the user config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "ccrm";
const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "CCRM";

const DEFAULT_CONFIG: &str = r#"# Campus Course & Records Manager configuration.

# Directory exports are written to and backups are taken from.
data_dir = "data"

# Directory timestamped backups are created under.
backup_dir = "backup"

# File names used inside data_dir by export and import.
student_export_file = "students_export.csv"
course_export_file = "courses_export.json"

# Seed the store with a sample student and course on startup.
seed_demo_data = true
"#;

/// Runtime settings for the records manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory the persistence adapter reads and writes.
    pub data_dir: PathBuf,
    /// Root under which backups are created and measured.
    pub backup_dir: PathBuf,
    /// Student export file name inside `data_dir`.
    pub student_export_file: String,
    /// Course catalog file name inside `data_dir`.
    pub course_export_file: String,
    /// Whether the frontend seeds sample records at startup.
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            backup_dir: PathBuf::from("backup"),
            student_export_file: "students_export.csv".to_string(),
            course_export_file: "courses_export.json".to_string(),
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration using `path` as the optional file layer.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default(
                "backup_dir",
                defaults.backup_dir.to_string_lossy().to_string(),
            )?
            .set_default("student_export_file", defaults.student_export_file)?
            .set_default("course_export_file", defaults.course_export_file)?
            .set_default("seed_demo_data", defaults.seed_demo_data)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Path of the student export file.
    pub fn student_export_path(&self) -> PathBuf {
        self.data_dir.join(&self.student_export_file)
    }
}

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write a commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}
