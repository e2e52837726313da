//! Best-effort lock-screen refresh.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::wallpaper::Desktop;

/// Copy the new wallpaper to the lock-screen image location.
///
/// Returns whether a copy happened. Failures are logged and swallowed.
pub fn update(desktop: &dyn Desktop, wallpaper: &Path) -> bool {
    let Some(target) = desktop.lock_screen_target() else {
        tracing::info!("no lock screen image path configured, skipping");
        return false;
    };
    match copy_to(wallpaper, &target) {
        Ok(()) => {
            tracing::info!(target = %target.display(), "updated lock screen image");
            true
        }
        Err(err) => {
            tracing::warn!("lock screen update failed: {err:#}");
            false
        }
    }
}

fn copy_to(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::copy(source, target).with_context(|| {
        format!(
            "failed to copy {} to {}",
            source.display(),
            target.display()
        )
    })?;
    Ok(())
}
