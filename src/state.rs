//! Persisted run state: where files live and the last applied timestamp.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name under the per-user local application data directory.
const APP_DIR: &str = "DailyWallpaper";
/// Holds the `startdate` of the last applied wallpaper.
const TIMESTAMP_FILE: &str = "current.txt";
/// The managed wallpaper image.
const WALLPAPER_FILE: &str = "bg.jpg";
const LOG_DIR: &str = "logs";

/// Locations of every file the run reads or writes.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub timestamp: PathBuf,
    pub wallpaper: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    /// Resolve `<LocalAppData>/DailyWallpaper`.
    pub fn default_location() -> Result<Self> {
        let base = BaseDirs::new().ok_or_else(|| anyhow!("cannot determine local data directory"))?;
        Ok(Self::under(base.data_local_dir().join(APP_DIR)))
    }

    /// Lay out files under `data_dir`, made absolute against the working
    /// directory so it compares equal to the path the desktop reports.
    pub fn under(data_dir: PathBuf) -> Self {
        let data_dir = std::path::absolute(&data_dir).unwrap_or(data_dir);
        Self {
            timestamp: data_dir.join(TIMESTAMP_FILE),
            wallpaper: data_dir.join(WALLPAPER_FILE),
            log_dir: data_dir.join(LOG_DIR),
            data_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create {}", self.data_dir.display()))
    }
}

/// Read the last applied timestamp; missing or unreadable files yield "".
pub fn read_timestamp(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "no previous timestamp");
            String::new()
        }
    }
}

/// Overwrite the timestamp file with `startdate`.
pub fn write_timestamp(path: &Path, startdate: &str) -> Result<()> {
    fs::write(path, startdate).with_context(|| format!("failed to write {}", path.display()))
}
