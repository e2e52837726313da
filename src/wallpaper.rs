//! Desktop wallpaper, display and lock-screen access.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::resolution::MonitorRect;

/// How the image is laid out on each monitor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StyleMode {
    Fill,
    Fit,
    Stretch,
    Tile,
    Center,
    Span,
}

/// The operating-system services one run needs.
pub trait Desktop {
    /// Path of the wallpaper currently shown on the desktop.
    fn current_wallpaper(&self) -> Result<PathBuf>;

    /// Show `path` on every monitor.
    fn set_wallpaper(&self, path: &Path) -> Result<()>;

    fn set_style(&self, style: StyleMode) -> Result<()>;

    /// Bounding rectangles of all connected displays.
    fn monitor_rects(&self) -> Result<Vec<MonitorRect>>;

    /// File the lock screen reads its image from, when one is configured.
    fn lock_screen_target(&self) -> Option<PathBuf>;
}

#[cfg(windows)]
pub use self::windows_impl::WindowsDesktop;

/// Acquire the platform desktop.
#[cfg(windows)]
pub fn open_desktop() -> Result<WindowsDesktop> {
    WindowsDesktop::new()
}

#[cfg(not(windows))]
pub fn open_desktop() -> Result<UnsupportedDesktop> {
    Err(anyhow::anyhow!(
        "setting the desktop wallpaper is only supported on Windows"
    ))
}

/// Placeholder type so non-Windows builds type-check.
#[cfg(not(windows))]
pub enum UnsupportedDesktop {}

#[cfg(not(windows))]
impl Desktop for UnsupportedDesktop {
    fn current_wallpaper(&self) -> Result<PathBuf> {
        match *self {}
    }

    fn set_wallpaper(&self, _path: &Path) -> Result<()> {
        match *self {}
    }

    fn set_style(&self, _style: StyleMode) -> Result<()> {
        match *self {}
    }

    fn monitor_rects(&self) -> Result<Vec<MonitorRect>> {
        match *self {}
    }

    fn lock_screen_target(&self) -> Option<PathBuf> {
        match *self {}
    }
}

#[cfg(windows)]
mod windows_impl {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use std::path::{Path, PathBuf};

    use anyhow::{anyhow, Context, Result};
    use windows::core::{PCWSTR, PWSTR};
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoTaskMemFree, CoUninitialize, CLSCTX_ALL,
        COINIT_APARTMENTTHREADED,
    };
    use windows::Win32::UI::Shell::{
        DesktopWallpaper, IDesktopWallpaper, DESKTOP_WALLPAPER_POSITION, DWPOS_CENTER,
        DWPOS_FILL, DWPOS_FIT, DWPOS_SPAN, DWPOS_STRETCH, DWPOS_TILE,
    };
    use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE};
    use winreg::RegKey;

    use super::{Desktop, StyleMode};
    use crate::resolution::MonitorRect;

    /// Registry key holding the enforced lock-screen image location.
    const PERSONALIZATION_KEY: &str =
        "SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\PersonalizationCSP";
    const LOCK_SCREEN_VALUE: &str = "LockScreenImagePath";

    /// `IDesktopWallpaper` on an apartment-threaded COM initialization.
    pub struct WindowsDesktop {
        wallpaper: IDesktopWallpaper,
        // Declared last so the interface is released before COM shuts down.
        _com: ComApartment,
    }

    struct ComApartment;

    impl ComApartment {
        fn enter() -> Result<Self> {
            unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
                .ok()
                .context("CoInitializeEx failed")?;
            Ok(Self)
        }
    }

    impl Drop for ComApartment {
        fn drop(&mut self) {
            unsafe { CoUninitialize() };
        }
    }

    impl WindowsDesktop {
        pub fn new() -> Result<Self> {
            let com = ComApartment::enter()?;
            let wallpaper: IDesktopWallpaper =
                unsafe { CoCreateInstance(&DesktopWallpaper, None, CLSCTX_ALL) }
                    .map_err(|err| anyhow!("cannot create DesktopWallpaper: {err}"))?;
            Ok(Self {
                wallpaper,
                _com: com,
            })
        }
    }

    impl Desktop for WindowsDesktop {
        fn current_wallpaper(&self) -> Result<PathBuf> {
            let raw = unsafe { self.wallpaper.GetWallpaper(PCWSTR::null()) }
                .map_err(|err| anyhow!("GetWallpaper failed: {err}"))?;
            let path = take_string(raw)?;
            Ok(PathBuf::from(path))
        }

        fn set_wallpaper(&self, path: &Path) -> Result<()> {
            let wide = to_wide_null(path.as_os_str());
            unsafe {
                self.wallpaper
                    .SetWallpaper(PCWSTR::null(), PCWSTR(wide.as_ptr()))
            }
            .map_err(|err| anyhow!("SetWallpaper failed: {err}"))
        }

        fn set_style(&self, style: StyleMode) -> Result<()> {
            unsafe { self.wallpaper.SetPosition(position(style)) }
                .map_err(|err| anyhow!("SetPosition failed: {err}"))
        }

        fn monitor_rects(&self) -> Result<Vec<MonitorRect>> {
            let count = unsafe { self.wallpaper.GetMonitorDevicePathCount() }
                .map_err(|err| anyhow!("GetMonitorDevicePathCount failed: {err}"))?;
            let mut rects = Vec::with_capacity(count as usize);
            for index in 0..count {
                let raw = unsafe { self.wallpaper.GetMonitorDevicePathAt(index) }
                    .map_err(|err| anyhow!("GetMonitorDevicePathAt({index}) failed: {err}"))?;
                let id = take_string(raw)?;
                let wide = to_wide_null(OsStr::new(&id));
                // Detached monitors keep a device path but have no rectangle.
                match unsafe { self.wallpaper.GetMonitorRECT(PCWSTR(wide.as_ptr())) } {
                    Ok(rect) => rects.push(MonitorRect::new(
                        rect.left,
                        rect.top,
                        rect.right,
                        rect.bottom,
                    )),
                    Err(err) => tracing::debug!(monitor = %id, %err, "skipping monitor"),
                }
            }
            Ok(rects)
        }

        fn lock_screen_target(&self) -> Option<PathBuf> {
            let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
            let key = match hklm.open_subkey_with_flags(PERSONALIZATION_KEY, KEY_QUERY_VALUE) {
                Ok(key) => key,
                Err(err) => {
                    tracing::debug!(%err, "no personalization policy key");
                    return None;
                }
            };
            match key.get_value::<String, _>(LOCK_SCREEN_VALUE) {
                Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
                Ok(_) => None,
                Err(err) => {
                    tracing::debug!(%err, "no lock screen image path configured");
                    None
                }
            }
        }
    }

    fn position(style: StyleMode) -> DESKTOP_WALLPAPER_POSITION {
        match style {
            StyleMode::Fill => DWPOS_FILL,
            StyleMode::Fit => DWPOS_FIT,
            StyleMode::Stretch => DWPOS_STRETCH,
            StyleMode::Tile => DWPOS_TILE,
            StyleMode::Center => DWPOS_CENTER,
            StyleMode::Span => DWPOS_SPAN,
        }
    }

    /// Copy a COM-allocated string and free it.
    fn take_string(raw: PWSTR) -> Result<String> {
        let value = unsafe { raw.to_string() };
        unsafe { CoTaskMemFree(Some(raw.0 as *const _)) };
        value.context("wide string is not valid UTF-16")
    }

    fn to_wide_null(value: &OsStr) -> Vec<u16> {
        value.encode_wide().chain(std::iter::once(0)).collect()
    }
}
