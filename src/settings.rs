//! Persisted configuration and its IO.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::resolution::Resolution;
use crate::wallpaper::StyleMode;

/// File name used under the per-user config directory.
const SETTINGS_FILE: &str = "settings.json";

/// Settings persisted to `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Scheme and host serving both metadata and images.
    pub origin: String,
    /// Bing market code, e.g. `en-US`.
    pub market: String,
    /// Upper bound for the whole download phase.
    pub download_timeout_secs: u64,
    /// Resolutions tried in addition to the connected monitors.
    pub fallback_resolutions: Vec<Resolution>,
    /// Wallpaper position; left untouched when unset.
    pub style: Option<StyleMode>,
    /// Whether to copy the image to the lock-screen location.
    pub update_lock_screen: bool,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            origin: "https://www.bing.com".to_string(),
            market: "en-US".to_string(),
            download_timeout_secs: 15,
            fallback_resolutions: vec![Resolution::new(1920, 1200)],
            style: None,
            update_lock_screen: true,
            log_level: "info".to_string(),
        }
    }
}

/// Build the settings path and ensure the directory exists.
pub fn settings_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "DailyWallpaper")
        .ok_or_else(|| anyhow!("cannot determine config directory"))?;
    let config_dir = proj_dirs.config_dir();
    fs::create_dir_all(config_dir)?;
    Ok(config_dir.join(SETTINGS_FILE))
}

/// Load settings from `path`, returning defaults when missing or invalid.
pub fn load(path: &Path) -> AppSettings {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return AppSettings::default(),
    };
    serde_json::from_str(&contents).unwrap_or_else(|err| {
        eprintln!("ignoring invalid settings in {}: {err}", path.display());
        AppSettings::default()
    })
}

/// Persist settings as pretty JSON.
pub fn save(path: &Path, settings: &AppSettings) -> Result<()> {
    let contents = serde_json::to_string_pretty(settings)?;
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
