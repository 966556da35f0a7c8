//! Size classes shared by the composite and its stars.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseSizeError;

/// Pixel metrics keyed off [`SizeClass`].
pub mod metrics {
    /// Star box size for `small`.
    pub const SMALL_PX: u32 = 16;
    /// Star box size for `medium`.
    pub const MEDIUM_PX: u32 = 24;
    /// Star box size for `large`.
    pub const LARGE_PX: u32 = 32;
    /// Gap between adjacent stars (small, medium, large).
    pub const GAP_PX: [u32; 3] = [2, 4, 6];
    /// Focus outline offset (small, medium, large).
    pub const OUTLINE_OFFSET_PX: [u32; 3] = [2, 3, 4];
    /// Focus outline corner radius (small, medium, large).
    pub const CORNER_RADIUS_PX: [u32; 3] = [2, 4, 6];
    /// Focus outline stroke width, independent of size.
    pub const OUTLINE_WIDTH_PX: u32 = 2;
}

/// Star size. `small` = 16px, `medium` = 24px, `large` = 32px.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeClass {
    /// All size classes, smallest first.
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    /// Parse a markup/script token. Anything but the three exact tokens is `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }

    /// The token form used in markup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Value of the reflected `size` attribute. Medium is implicit.
    pub fn attribute_value(self) -> Option<&'static str> {
        match self {
            Self::Medium => None,
            other => Some(other.as_str()),
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }

    /// Edge length of one star box in pixels.
    pub fn star_px(self) -> u32 {
        match self {
            Self::Small => metrics::SMALL_PX,
            Self::Medium => metrics::MEDIUM_PX,
            Self::Large => metrics::LARGE_PX,
        }
    }

    /// Gap between adjacent stars in pixels.
    pub fn gap_px(self) -> u32 {
        metrics::GAP_PX[self.index()]
    }

    /// Focus outline offset in pixels.
    pub fn outline_offset_px(self) -> u32 {
        metrics::OUTLINE_OFFSET_PX[self.index()]
    }

    /// Focus outline corner radius in pixels.
    pub fn corner_radius_px(self) -> u32 {
        metrics::CORNER_RADIUS_PX[self.index()]
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeClass {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseSizeError(s.to_string()))
    }
}
