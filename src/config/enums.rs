//! Configuration enum types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the region captured around the screen center.
///
/// The fixed sizes match the in-game media they are meant for: ship log
/// entries use 512×512 images, slide reels 1024×1024.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    /// The whole screen
    Full,
    /// 512×512 centered square
    ShipLog,
    /// 1024×1024 centered square
    SlideReel,
    /// `custom_width` × `custom_height` centered rectangle
    Custom,
}

impl CaptureMode {
    pub const ALL: [CaptureMode; 4] = [Self::Full, Self::ShipLog, Self::SlideReel, Self::Custom];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::ShipLog => "ShipLog",
            Self::SlideReel => "SlideReel",
            Self::Custom => "Custom",
        }
    }

    /// Fixed square edge for the preset sizes, `None` for screen-dependent modes.
    pub fn fixed_size(&self) -> Option<i32> {
        match self {
            Self::ShipLog => Some(512),
            Self::SlideReel => Some(1024),
            Self::Full | Self::Custom => None,
        }
    }

    /// Case-insensitive lookup by label or kebab-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(&wanted))
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-pixel color-to-grey policy applied before encoding.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum GreyscaleMode {
    /// Keep the original colors
    None,
    /// BT.601 weighted luminance: 0.299 R + 0.587 G + 0.114 B
    Luminance,
    /// Mean of the three channels
    Average,
    /// Brightest of the three channels
    Maximum,
}

impl GreyscaleMode {
    pub const ALL: [GreyscaleMode; 4] = [Self::None, Self::Luminance, Self::Average, Self::Maximum];

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Luminance => "Luminance",
            Self::Average => "Average",
            Self::Maximum => "Maximum",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for GreyscaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
