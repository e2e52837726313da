//! Run-level failures and their process exit codes.

use std::time::Duration;

use crate::bing::MetadataError;
use crate::download::DownloadError;

/// A failure that ends the run early.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("desktop wallpaper interface unavailable: {0:#}")]
    WallpaperUnavailable(anyhow::Error),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("download did not finish within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("download failed: {0}")]
    Download(DownloadError),

    #[error("failed to apply wallpaper: {0:#}")]
    Apply(anyhow::Error),

    #[error("failed to persist update timestamp: {0:#}")]
    State(anyhow::Error),
}

impl From<DownloadError> for RunError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::DeadlineExceeded(deadline) => RunError::DeadlineExceeded(deadline),
            other => RunError::Download(other),
        }
    }
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::WallpaperUnavailable(_) | RunError::Metadata(_) | RunError::Apply(_) => 1,
            RunError::DeadlineExceeded(_) => 2,
            RunError::Download(_) => 3,
            RunError::State(_) => 4,
        }
    }
}
