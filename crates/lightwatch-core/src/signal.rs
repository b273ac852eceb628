//! Signal colors and per-frame detections

use crate::region::Region;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color reported for a frame.
///
/// `Red` is the priority color and is searched first; `Green` is the
/// fallback color and only wins when no red signal is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalColor {
    Red,
    Green,
    Unknown,
}

impl SignalColor {
    pub fn label(&self) -> &'static str {
        match self {
            SignalColor::Red => "RED",
            SignalColor::Green => "GREEN",
            SignalColor::Unknown => "UNKNOWN",
        }
    }

    /// Drawing color (R, G, B) used for annotated output
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            SignalColor::Red => (255, 0, 0),
            SignalColor::Green => (0, 255, 0),
            SignalColor::Unknown => (128, 128, 128),
        }
    }
}

impl fmt::Display for SignalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Outcome of one frame: the active color and where it was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub color: SignalColor,
    pub region: Region,
}

impl Detection {
    pub fn new(color: SignalColor, region: Region) -> Self {
        Self { color, region }
    }

    /// No signal in this frame
    pub fn unknown() -> Self {
        Self::new(SignalColor::Unknown, Region::empty())
    }

    pub fn is_unknown(&self) -> bool {
        self.color == SignalColor::Unknown
    }

    /// Same color, different region
    pub fn with_region(self, region: Region) -> Self {
        Self { region, ..self }
    }
}

impl Default for Detection {
    fn default() -> Self {
        Self::unknown()
    }
}
