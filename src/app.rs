//! One update run: fetch, decide, download, apply, persist.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::bing;
use crate::decision;
use crate::download::{Resolver, Source};
use crate::error::RunError;
use crate::lockscreen;
use crate::resolution::{self, Resolution};
use crate::state::{self, AppPaths};
use crate::wallpaper::{Desktop, StyleMode};

/// Effective options for a run, after settings and CLI overrides.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub origin: Url,
    pub market: String,
    pub deadline: Duration,
    pub fallback_resolutions: Vec<Resolution>,
    pub style: Option<StyleMode>,
    pub update_lock_screen: bool,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    UpToDate,
    Updated { startdate: String, source: Source },
}

pub async fn run(
    config: &RunConfig,
    paths: &AppPaths,
    desktop: &dyn Desktop,
    client: &Client,
) -> Result<Outcome, RunError> {
    let meta = bing::fetch(client, &config.origin, &config.market).await?;
    tracing::info!(
        startdate = %meta.startdate,
        title = meta.title.as_deref().unwrap_or_default(),
        copyright = meta.copyright.as_deref().unwrap_or_default(),
        "image of the day"
    );

    if config.force {
        tracing::info!("update forced");
    } else {
        let persisted = state::read_timestamp(&paths.timestamp);
        let decision = decision::decide(&meta.startdate, &persisted, &paths.wallpaper, || {
            match desktop.current_wallpaper() {
                Ok(path) => Some(path.to_string_lossy().into_owned()),
                Err(err) => {
                    tracing::warn!("cannot read current wallpaper: {err:#}");
                    None
                }
            }
        });
        if !decision.needs_update() {
            tracing::info!("wallpaper is up to date");
            return Ok(Outcome::UpToDate);
        }
        tracing::info!(?decision, "wallpaper needs an update");
    }

    let rects = desktop.monitor_rects().unwrap_or_else(|err| {
        tracing::warn!("cannot enumerate monitors: {err:#}");
        Vec::new()
    });
    let wanted = resolution::candidates(&rects, config.fallback_resolutions.iter().copied());
    let listed: Vec<String> = wanted.iter().map(Resolution::to_string).collect();
    tracing::info!(candidates = ?listed, "downloading wallpaper");

    let source = Resolver::new(client, &config.origin)
        .download(&meta, wanted, &paths.wallpaper, config.deadline)
        .await?;

    if let Some(style) = config.style {
        if let Err(err) = desktop.set_style(style) {
            tracing::warn!("cannot set wallpaper style: {err:#}");
        }
    }
    desktop
        .set_wallpaper(&paths.wallpaper)
        .map_err(RunError::Apply)?;
    tracing::info!(path = %paths.wallpaper.display(), "wallpaper applied");

    if config.update_lock_screen {
        lockscreen::update(desktop, &paths.wallpaper);
    }

    state::write_timestamp(&paths.timestamp, &meta.startdate).map_err(RunError::State)?;
    Ok(Outcome::Updated {
        startdate: meta.startdate,
        source,
    })
}
