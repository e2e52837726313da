//! Decide whether today's image has to be downloaded again.

use std::path::Path;

/// Why a refresh is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// The remote `startdate` differs from the persisted one.
    TimestampChanged { previous: String, current: String },
    /// The desktop shows something other than the managed file.
    WallpaperChanged { current: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Update(Staleness),
    UpToDate,
}

impl Decision {
    pub fn needs_update(&self) -> bool {
        matches!(self, Decision::Update(_))
    }
}

/// Compare remote and local state.
///
/// `current_wallpaper` is only consulted when the timestamps agree. It yields
/// `None` when the desktop could not be queried; that never forces a refresh
/// on its own.
pub fn decide<F>(
    startdate: &str,
    persisted: &str,
    expected_wallpaper: &Path,
    current_wallpaper: F,
) -> Decision
where
    F: FnOnce() -> Option<String>,
{
    if startdate != persisted {
        return Decision::Update(Staleness::TimestampChanged {
            previous: persisted.to_string(),
            current: startdate.to_string(),
        });
    }

    match current_wallpaper() {
        Some(current) if !same_path(expected_wallpaper, &current) => {
            Decision::Update(Staleness::WallpaperChanged { current })
        }
        _ => Decision::UpToDate,
    }
}

// Windows paths compare case-insensitively.
fn same_path(expected: &Path, current: &str) -> bool {
    expected.to_string_lossy().to_lowercase() == current.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = r"C:\Users\me\AppData\Local\DailyWallpaper\bg.jpg";

    #[test]
    fn new_startdate_forces_update_regardless_of_desktop() {
        for current in [None, Some(EXPECTED), Some(r"C:\other.png")] {
            let decision = decide("2024-01-02", "2024-01-01", Path::new(EXPECTED), || {
                current.map(str::to_string)
            });
            assert_eq!(
                decision,
                Decision::Update(Staleness::TimestampChanged {
                    previous: "2024-01-01".into(),
                    current: "2024-01-02".into(),
                })
            );
        }
    }

    #[test]
    fn matching_path_ignores_case() {
        let decision = decide("2024-01-01", "2024-01-01", Path::new(EXPECTED), || {
            Some(EXPECTED.to_uppercase())
        });
        assert_eq!(decision, Decision::UpToDate);
    }

    #[test]
    fn different_desktop_wallpaper_forces_update() {
        let decision = decide(
            "2024-01-01",
            "2024-01-01",
            Path::new(EXPECTED),
            || Some(r"C:\Windows\Web\Wallpaper\Windows\img0.jpg".to_string()),
        );
        assert!(decision.needs_update());
        assert!(matches!(
            decision,
            Decision::Update(Staleness::WallpaperChanged { .. })
        ));
    }

    #[test]
    fn failed_desktop_query_is_inconclusive() {
        let decision = decide("2024-01-01", "2024-01-01", Path::new(EXPECTED), || None);
        assert_eq!(decision, Decision::UpToDate);
    }

    #[test]
    fn empty_persisted_timestamp_means_first_run() {
        let decision = decide("20240101", "", Path::new(EXPECTED), || {
            Some(EXPECTED.to_string())
        });
        assert!(decision.needs_update());
    }

    #[test]
    fn desktop_is_not_queried_when_timestamp_changed() {
        let mut queried = false;
        decide("20240102", "20240101", Path::new(EXPECTED), || {
            queried = true;
            None
        });
        assert!(!queried);
    }
}
