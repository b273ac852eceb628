//! Per-frame color signal extraction

use super::config::{ColorProfile, DetectionConfig};
use crate::traits::ImageOps;
use crate::Result;
use anyhow::anyhow;
use lightwatch_core::{Detection, Region, SignalColor};
use log::debug;

/// Finds at most one lamp per frame: red in the upper zone first, then green
/// in the lower zone.
///
/// Red takes the first contour above its area floor; green takes the largest
/// one. Red is expected at most once per frame, while several green blobs
/// (foliage, signs) are common and size is the better discriminator there.
pub struct ColorSignalExtractor<B: ImageOps> {
    backend: B,
    config: DetectionConfig,
}

/// Frame dimensions and the HSV rendition shared by both color searches
struct FrameContext<H> {
    hsv: H,
    width: i32,
    height: i32,
}

impl<B: ImageOps> ColorSignalExtractor<B> {
    pub fn new(backend: B, config: DetectionConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect the active color and its expanded bounding region
    pub fn extract(&self, frame: &B::Frame) -> Result<Detection> {
        let (width, height) = self.backend.frame_size(frame)?;
        let ctx = FrameContext {
            hsv: self.backend.to_hsv(frame)?,
            width,
            height,
        };

        if let Some(region) = self.first_match(&ctx, &self.config.red)? {
            return Ok(Detection::new(SignalColor::Red, region));
        }

        if let Some(region) = self.largest_area(&ctx, &self.config.green)? {
            return Ok(Detection::new(SignalColor::Green, region));
        }

        Ok(Detection::unknown())
    }

    /// Union of every range of the profile, closed with its kernel
    fn color_mask(&self, hsv: &B::Hsv, profile: &ColorProfile) -> Result<B::Mask> {
        let mut ranges = profile.ranges.iter();
        let first = ranges
            .next()
            .ok_or_else(|| anyhow!("Color profile has no HSV ranges"))?;

        let mut mask = self.backend.threshold(hsv, first)?;
        for range in ranges {
            let next = self.backend.threshold(hsv, range)?;
            mask = self.backend.union(&mask, &next)?;
        }

        self.backend.close(&mask, profile.kernel_size)
    }

    /// Mask restricted to the profile's zone, plus the zone's frame position
    fn zone_contours(
        &self,
        ctx: &FrameContext<B::Hsv>,
        profile: &ColorProfile,
    ) -> Result<Option<(Region, Vec<B::Contour>)>> {
        let zone = profile.zone.to_region(ctx.width, ctx.height);
        if zone.is_empty() {
            debug!("zone '{}' is empty for a {}x{} frame", profile.zone.name, ctx.width, ctx.height);
            return Ok(None);
        }

        let mask = self.color_mask(&ctx.hsv, profile)?;
        let zone_mask = self.backend.crop(&mask, zone)?;
        let contours = self.backend.find_external_contours(&zone_mask)?;
        Ok(Some((zone, contours)))
    }

    /// Zone-local bounding box → expanded frame region
    fn frame_region(&self, ctx: &FrameContext<B::Hsv>, zone: Region, local: Region, margin: i32) -> Region {
        local
            .translate(zone.x, zone.y)
            .expand_clamped(margin, ctx.width, ctx.height)
    }

    /// First contour, in backend order, whose area exceeds the floor.
    /// Backends list the last-discovered border first, so the lowest blob in
    /// the zone is checked before the ones above it.
    fn first_match(&self, ctx: &FrameContext<B::Hsv>, profile: &ColorProfile) -> Result<Option<Region>> {
        let Some((zone, contours)) = self.zone_contours(ctx, profile)? else {
            return Ok(None);
        };

        for contour in &contours {
            let area = self.backend.contour_area(contour);
            if area > profile.min_area {
                let local = self.backend.bounding_box(contour);
                let region = self.frame_region(ctx, zone, local, profile.margin);
                debug!("red contour area {:.1} in '{}' -> {}", area, profile.zone.name, region);
                return Ok(Some(region));
            }
        }

        Ok(None)
    }

    /// Largest contour whose area exceeds the floor; ties keep the earlier one
    fn largest_area(&self, ctx: &FrameContext<B::Hsv>, profile: &ColorProfile) -> Result<Option<Region>> {
        let Some((zone, contours)) = self.zone_contours(ctx, profile)? else {
            return Ok(None);
        };

        let mut best: Option<(f64, &B::Contour)> = None;
        for contour in &contours {
            let area = self.backend.contour_area(contour);
            if area <= profile.min_area {
                continue;
            }
            if best.is_none_or(|(best_area, _)| area > best_area) {
                best = Some((area, contour));
            }
        }

        Ok(best.map(|(area, contour)| {
            let local = self.backend.bounding_box(contour);
            let region = self.frame_region(ctx, zone, local, profile.margin);
            debug!(
                "green contour area {:.1} (of {}) in '{}' -> {}",
                area,
                contours.len(),
                profile.zone.name,
                region
            );
            region
        }))
    }
}
