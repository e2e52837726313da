//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

const EXIT_CODES: &str = "\
Exit codes:
  0  wallpaper updated or already current
  1  wallpaper interface unavailable, metadata failed, or wallpaper not applied
  2  download deadline exceeded
  3  download failed
  4  update timestamp not saved";

#[derive(Debug, Parser)]
#[command(name = "daily-wallpaper")]
#[command(about = "Apply the Bing image of the day as desktop wallpaper", long_about = None)]
#[command(after_help = EXIT_CODES)]
pub struct Cli {
    /// Settings file to use instead of the per-user default.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the timestamp, image and logs.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Download deadline in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Bing market code, e.g. en-GB.
    #[arg(long)]
    pub market: Option<String>,

    /// Download and apply even when the wallpaper is current.
    #[arg(long)]
    pub force: bool,

    /// Write the effective settings to the settings file and exit.
    #[arg(long)]
    pub write_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "daily-wallpaper",
            "--timeout",
            "30",
            "--market",
            "en-GB",
            "--force",
        ])
        .unwrap();
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.market.as_deref(), Some("en-GB"));
        assert!(cli.force);
        assert!(!cli.write_config);
    }

    #[test]
    fn help_lists_exit_codes() {
        use clap::CommandFactory;

        let help = Cli::command().render_help().to_string();
        assert!(help.contains("Exit codes:"));
        assert!(help.contains("3  download failed"));
        assert!(help.contains("4  update timestamp not saved"));
    }

    #[test]
    fn no_arguments_is_a_plain_run() {
        let cli = Cli::try_parse_from(["daily-wallpaper"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.force);
    }
}
