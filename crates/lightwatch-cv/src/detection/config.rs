//! Detection configuration

use crate::backend::pixel::morphology::MAX_KERNEL_SIZE;
use crate::zone::ZoneSpec;
use crate::Result;
use anyhow::Context;
use lightwatch_core::DEFAULT_HISTORY_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Main detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Priority color, searched first in its zone
    pub red: ColorProfile,
    /// Fallback color, searched only when no red signal is found
    pub green: ColorProfile,
    /// Number of regions averaged by the green stabilizer once warm
    pub history_size: usize,
}

/// Thresholds and geometry for one signal color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorProfile {
    /// Hue/saturation/value ranges, unioned into one mask
    pub ranges: Vec<HsvRange>,
    /// Side of the elliptical closing kernel in pixels
    pub kernel_size: u32,
    pub zone: ZoneSpec,
    /// Contours must be strictly larger than this (px²)
    pub min_area: f64,
    /// Pixels added on every side of the bounding box
    pub margin: i32,
}

/// Inclusive per-channel HSV bounds (hue 0..=180, saturation and value 0..=255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl HsvRange {
    pub const fn new(low: [u8; 3], high: [u8; 3]) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.low[c] <= hsv[c] && hsv[c] <= self.high[c])
    }
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{color} zone '{zone}' has fractions outside the frame")]
    ZoneOutOfRange { color: &'static str, zone: String },
    #[error("{color} zone '{zone}' has zero size")]
    EmptyZone { color: &'static str, zone: String },
    #[error("{color} profile has no HSV ranges")]
    NoRanges { color: &'static str },
    #[error("{color} range #{index} has a low bound above its high bound")]
    InvertedRange { color: &'static str, index: usize },
    #[error("{color} kernel size must be at least 1")]
    ZeroKernel { color: &'static str },
    #[error("{color} kernel size {size} exceeds {max}")]
    KernelTooLarge { color: &'static str, size: u32, max: u32 },
    #[error("{color} margin must not be negative (got {margin})")]
    NegativeMargin { color: &'static str, margin: i32 },
    #[error("{color} minimum area must not be negative")]
    NegativeArea { color: &'static str },
    #[error("history size must be at least 1")]
    ZeroHistory,
}

impl ColorProfile {
    fn validate(&self, color: &'static str) -> std::result::Result<(), ConfigError> {
        if self.ranges.is_empty() {
            return Err(ConfigError::NoRanges { color });
        }
        for (index, range) in self.ranges.iter().enumerate() {
            if (0..3).any(|c| range.low[c] > range.high[c]) {
                return Err(ConfigError::InvertedRange { color, index });
            }
        }
        if self.kernel_size == 0 {
            return Err(ConfigError::ZeroKernel { color });
        }
        if self.kernel_size > MAX_KERNEL_SIZE {
            return Err(ConfigError::KernelTooLarge {
                color,
                size: self.kernel_size,
                max: MAX_KERNEL_SIZE,
            });
        }
        if self.margin < 0 {
            return Err(ConfigError::NegativeMargin { color, margin: self.margin });
        }
        if self.min_area < 0.0 {
            return Err(ConfigError::NegativeArea { color });
        }
        if !self.zone.fractions_in_range() {
            return Err(ConfigError::ZoneOutOfRange {
                color,
                zone: self.zone.name.clone(),
            });
        }
        if self.zone.width <= 0.0 || self.zone.height <= 0.0 {
            return Err(ConfigError::EmptyZone {
                color,
                zone: self.zone.name.clone(),
            });
        }
        Ok(())
    }
}

impl DetectionConfig {
    /// Check every tunable before a session starts
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.red.validate("red")?;
        self.green.validate("green")?;
        if self.history_size == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: DetectionConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {:?}", path))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write config: {:?}", path))?;
        Ok(())
    }
}

impl ColorProfile {
    /// Red wraps around hue zero, so it needs two ranges
    pub fn red() -> Self {
        Self {
            ranges: vec![
                HsvRange::new([0, 120, 100], [10, 255, 255]),
                HsvRange::new([170, 120, 100], [180, 255, 255]),
            ],
            kernel_size: 15,
            zone: ZoneSpec::upper_band(),
            min_area: 300.0,
            margin: 30,
        }
    }

    pub fn green() -> Self {
        Self {
            ranges: vec![HsvRange::new([40, 60, 60], [90, 255, 255])],
            kernel_size: 20,
            zone: ZoneSpec::lower_band(),
            min_area: 200.0,
            margin: 45,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            red: ColorProfile::red(),
            green: ColorProfile::green(),
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}
