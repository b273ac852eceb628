//! RGB to 8-bit HSV conversion

use crate::Result;
use anyhow::anyhow;
use image::RgbImage;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// HSV frame stored channel-for-channel in an RGB buffer: [hue, saturation, value]
pub type HsvImage = RgbImage;

/// Convert one pixel. Hue is halved to fit 0..=180.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;

    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { diff * 255.0 / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    [(h / 2.0).round() as u8, s.round() as u8, v as u8]
}

/// Convert a whole frame
pub fn to_hsv(frame: &RgbImage) -> Result<HsvImage> {
    let (width, height) = frame.dimensions();
    let raw = frame.as_raw();
    let mut out = vec![0u8; raw.len()];

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(3)
        .zip(raw.par_chunks(3))
        .for_each(|(dst, src)| dst.copy_from_slice(&rgb_to_hsv([src[0], src[1], src[2]])));

    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(3)
        .zip(raw.chunks(3))
        .for_each(|(dst, src)| dst.copy_from_slice(&rgb_to_hsv([src[0], src[1], src[2]])));

    HsvImage::from_raw(width, height, out)
        .ok_or_else(|| anyhow!("HSV buffer does not match a {}x{} frame", width, height))
}
