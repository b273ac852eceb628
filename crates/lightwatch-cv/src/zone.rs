//! Search zones expressed as fractions of the frame

use lightwatch_core::Region;
use serde::{Deserialize, Serialize};

/// Named sub-rectangle of the frame, as proportions of its width and height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ZoneSpec {
    pub fn new(name: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    /// Upper band where the red lamp is expected
    pub fn upper_band() -> Self {
        Self::new("upper band", 0.10, 0.05, 0.80, 0.40)
    }

    /// Lower band where the green lamp is expected
    pub fn lower_band() -> Self {
        Self::new("lower band", 0.10, 0.70, 0.80, 0.25)
    }

    /// Pixel rectangle for a frame of the given size.
    ///
    /// Fractional pixels are truncated and the result is clipped to the frame.
    pub fn to_region(&self, frame_width: i32, frame_height: i32) -> Region {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        let zone = Region::new(
            (fw * self.x) as i32,
            (fh * self.y) as i32,
            (fw * self.width) as i32,
            (fh * self.height) as i32,
        );

        zone.intersect(&Region::new(0, 0, frame_width, frame_height))
    }

    pub fn fractions_in_range(&self) -> bool {
        let unit = 0.0..=1.0;
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| unit.contains(v))
            && self.x + self.width <= 1.0 + f64::EPSILON
            && self.y + self.height <= 1.0 + f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_vga() {
        assert_eq!(ZoneSpec::upper_band().to_region(640, 480), Region::new(64, 24, 512, 192));
        assert_eq!(ZoneSpec::lower_band().to_region(640, 480), Region::new(64, 336, 512, 120));
    }

    #[test]
    fn test_zone_clipped_to_frame() {
        let zone = ZoneSpec::new("overflow", 0.5, 0.5, 0.8, 0.8);
        assert!(!zone.fractions_in_range());
        assert_eq!(zone.to_region(100, 100), Region::new(50, 50, 50, 50));
    }
}
