//! Frame loading, saving and overlay drawing

use crate::Result;
use ab_glyph::{FontArc, PxScale};
use anyhow::{Context, anyhow};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use lightwatch_core::{Detection, Region};
use std::fs;
use std::path::Path;

/// Outline thickness used for annotated frames
pub const OUTLINE_THICKNESS: i32 = 4;

/// Side of the status swatch painted when no font is available
pub const STATUS_SWATCH_SIZE: u32 = 24;

const LABEL_SCALE: f32 = 24.0;
const CAPTION_SCALE: f32 = 36.0;

/// Image utility functions for frames handled with the pixel backend
pub struct ImageUtils;

impl ImageUtils {
    /// Load any supported image as an RGB frame
    pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
        let img = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?;
        Ok(img.to_rgb8())
    }

    /// Save an RGB frame; the format follows the file extension
    pub fn save_rgb<P: AsRef<Path>>(frame: &RgbImage, path: P) -> Result<()> {
        frame
            .save(&path)
            .with_context(|| format!("Failed to save image: {:?}", path.as_ref()))
    }

    /// Load a TrueType/OpenType font for captions
    pub fn load_font<P: AsRef<Path>>(path: P) -> Result<FontArc> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Failed to read font: {:?}", path))?;
        FontArc::try_from_vec(bytes).map_err(|_| anyhow!("Not a usable font file: {:?}", path))
    }

    /// Draw a rectangle outline of the given thickness, growing inward
    pub fn draw_outline(frame: &mut RgbImage, region: Region, color: Rgb<u8>, thickness: i32) {
        for inset in 0..thickness.max(1) {
            let width = region.width - 2 * inset;
            let height = region.height - 2 * inset;
            if width <= 0 || height <= 0 {
                break;
            }
            let rect = Rect::at(region.x + inset, region.y + inset).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(frame, rect, color);
        }
    }

    /// Mark a frame with its detection.
    ///
    /// The lamp gets an outline and, given a font, a "<COLOR> Light" label
    /// above it. The top-left corner shows "Detected: <COLOR>", or a plain
    /// color swatch without a font.
    pub fn draw_detection(frame: &mut RgbImage, detection: &Detection, font: Option<&FontArc>) {
        let (r, g, b) = detection.color.rgb();
        let color = Rgb([r, g, b]);
        let region = detection.region;

        if !region.is_empty() {
            Self::draw_outline(frame, region, color, OUTLINE_THICKNESS);
            if let Some(font) = font {
                let label = format!("{} Light", detection.color);
                let y = (region.y - 10 - LABEL_SCALE as i32).max(0);
                draw_text_mut(frame, color, region.x, y, PxScale::from(LABEL_SCALE), font, &label);
            }
        }

        match font {
            Some(font) => {
                let caption = format!("Detected: {}", detection.color);
                draw_text_mut(frame, color, 20, 10, PxScale::from(CAPTION_SCALE), font, &caption);
            }
            None => {
                let swatch = Rect::at(0, 0).of_size(STATUS_SWATCH_SIZE, STATUS_SWATCH_SIZE);
                draw_filled_rect_mut(frame, swatch, color);
            }
        }
    }
}
