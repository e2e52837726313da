mod app;
mod args;
mod bing;
mod decision;
mod download;
mod error;
mod lockscreen;
mod logging;
mod resolution;
mod settings;
mod state;
mod wallpaper;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser as _;
use reqwest::{Client, Url};

use crate::app::{Outcome, RunConfig};
use crate::error::RunError;
use crate::settings::AppSettings;
use crate::state::AppPaths;

fn main() -> ExitCode {
    let cli = args::Cli::parse();
    match real_main(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn real_main(cli: args::Cli) -> Result<ExitCode> {
    let settings_path = match &cli.config {
        Some(path) => path.clone(),
        None => settings::settings_path()?,
    };
    let settings = settings::load(&settings_path);

    if cli.write_config {
        settings::save(&settings_path, &settings)?;
        println!("{}", settings_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let paths = match &cli.data_dir {
        Some(dir) => AppPaths::under(dir.clone()),
        None => AppPaths::default_location()?,
    };
    paths.ensure_dirs()?;
    let _log = logging::init(&paths.log_dir, &settings.log_level);

    let config = run_config(&cli, &settings)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let result = runtime.block_on(async {
        let desktop = wallpaper::open_desktop().map_err(RunError::WallpaperUnavailable)?;
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| RunError::Metadata(err.into()))?;
        app::run(&config, &paths, &desktop, &client).await
    });

    Ok(match result {
        Ok(Outcome::UpToDate) => ExitCode::SUCCESS,
        Ok(Outcome::Updated { startdate, source }) => {
            tracing::info!(%startdate, %source, "wallpaper updated");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    })
}

/// Merge settings with command-line overrides.
fn run_config(cli: &args::Cli, settings: &AppSettings) -> Result<RunConfig> {
    let origin = Url::parse(&settings.origin)
        .with_context(|| format!("invalid origin {:?}", settings.origin))?;
    Ok(RunConfig {
        origin,
        market: cli.market.clone().unwrap_or_else(|| settings.market.clone()),
        deadline: Duration::from_secs(cli.timeout.unwrap_or(settings.download_timeout_secs)),
        fallback_resolutions: settings.fallback_resolutions.clone(),
        style: settings.style,
        update_lock_screen: settings.update_lock_screen,
        force: cli.force,
    })
}
