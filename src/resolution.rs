//! Monitor resolutions and the ordered download candidate list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

/// Bounding rectangle of one display, in virtual-screen coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MonitorRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl MonitorRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        span(self.left, self.right)
    }

    pub fn height(&self) -> u32 {
        span(self.top, self.bottom)
    }
}

// Inverted rectangles collapse to zero.
fn span(start: i32, end: i32) -> u32 {
    u32::try_from(i64::from(end) - i64::from(start)).unwrap_or(0)
}

/// A width x height pair ordered by pixel area, then width, then height.
///
/// Renders as `"{width}x{height}"`, which is also the token used in
/// resolution-specific image URLs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl From<MonitorRect> for Resolution {
    fn from(rect: MonitorRect) -> Self {
        Self::new(rect.width(), rect.height())
    }
}

impl Ord for Resolution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.area()
            .cmp(&other.area())
            .then_with(|| self.width.cmp(&other.width))
            .then_with(|| self.height.cmp(&other.height))
    }
}

impl PartialOrd for Resolution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let width = width
            .parse()
            .with_context(|| format!("invalid width in {s:?}"))?;
        let height = height
            .parse()
            .with_context(|| format!("invalid height in {s:?}"))?;
        Ok(Self::new(width, height))
    }
}

impl TryFrom<String> for Resolution {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

/// Build the download preference list: deduplicated, largest first.
///
/// Monitor-derived resolutions and configured extras are merged before
/// sorting, so an extra that matches a monitor appears once.
pub fn candidates<I>(rects: &[MonitorRect], extra: I) -> Vec<Resolution>
where
    I: IntoIterator<Item = Resolution>,
{
    let mut wanted: Vec<Resolution> = rects
        .iter()
        .copied()
        .map(Resolution::from)
        .chain(extra)
        .collect();
    wanted.sort_unstable_by(|a, b| b.cmp(a));
    wanted.dedup();
    wanted
}
