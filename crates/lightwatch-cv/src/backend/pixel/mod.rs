//! Pure-Rust `ImageOps` over `image` buffers, with `imageproc` doing the
//! morphology and contour work

pub mod hsv;
pub mod morphology;

use crate::detection::config::HsvRange;
use crate::traits::ImageOps;
use crate::Result;
use anyhow::ensure;
use hsv::HsvImage;
use image::{GrayImage, Luma, RgbImage, imageops};
use imageproc::contours::{self, BorderType, Contour};
use imageproc::geometry;
use lightwatch_core::Region;

/// Backend working on `RgbImage` frames and `GrayImage` masks
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelBackend;

impl PixelBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageOps for PixelBackend {
    type Frame = RgbImage;
    type Hsv = HsvImage;
    type Mask = GrayImage;
    type Contour = Contour<i32>;

    fn frame_size(&self, frame: &RgbImage) -> Result<(i32, i32)> {
        let (width, height) = frame.dimensions();
        Ok((width as i32, height as i32))
    }

    fn to_hsv(&self, frame: &RgbImage) -> Result<HsvImage> {
        hsv::to_hsv(frame)
    }

    fn threshold(&self, hsv: &HsvImage, range: &HsvRange) -> Result<GrayImage> {
        let (width, height) = hsv.dimensions();
        Ok(GrayImage::from_fn(width, height, |x, y| {
            let inside = range.contains(hsv.get_pixel(x, y).0);
            Luma([if inside { 255 } else { 0 }])
        }))
    }

    fn union(&self, a: &GrayImage, b: &GrayImage) -> Result<GrayImage> {
        ensure!(
            a.dimensions() == b.dimensions(),
            "Mask size mismatch: {:?} vs {:?}",
            a.dimensions(),
            b.dimensions()
        );
        let (width, height) = a.dimensions();
        Ok(GrayImage::from_fn(width, height, |x, y| {
            Luma([a.get_pixel(x, y)[0].max(b.get_pixel(x, y)[0])])
        }))
    }

    fn close(&self, mask: &GrayImage, kernel_size: u32) -> Result<GrayImage> {
        Ok(morphology::close(mask, kernel_size))
    }

    fn crop(&self, mask: &GrayImage, zone: Region) -> Result<GrayImage> {
        let (width, height) = mask.dimensions();
        ensure!(
            zone.fits_within(width as i32, height as i32),
            "Zone {} lies outside a {}x{} mask",
            zone,
            width,
            height
        );
        Ok(imageops::crop_imm(
            mask,
            zone.x as u32,
            zone.y as u32,
            zone.width as u32,
            zone.height as u32,
        )
        .to_image())
    }

    /// Outer borders of top-level components, last discovered first.
    ///
    /// `imageproc` reports borders in raster-scan discovery order; OpenCV's
    /// `findContours` lists them the other way round, so the list is
    /// reversed to keep both backends agreeing on which contour comes first.
    fn find_external_contours(&self, mask: &GrayImage) -> Result<Vec<Contour<i32>>> {
        Ok(contours::find_contours::<i32>(mask)
            .into_iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .rev()
            .collect())
    }

    fn contour_area(&self, contour: &Contour<i32>) -> f64 {
        if contour.points.len() < 3 {
            return 0.0;
        }
        geometry::contour_area(&contour.points).abs()
    }

    fn bounding_box(&self, contour: &Contour<i32>) -> Region {
        let mut points = contour.points.iter();
        let Some(first) = points.next() else {
            return Region::empty();
        };

        let (min_x, min_y, max_x, max_y) = points.fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        );
        Region::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn fill(mask: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
        for yy in y..y + h {
            for xx in x..x + w {
                mask.put_pixel(xx, yy, Luma([255]));
            }
        }
    }

    #[test]
    fn test_threshold_and_union() -> Result<()> {
        let backend = PixelBackend::new();
        let mut frame = RgbImage::new(4, 1);
        frame.put_pixel(0, 0, Rgb([255, 0, 0]));
        frame.put_pixel(1, 0, Rgb([255, 0, 40]));
        frame.put_pixel(2, 0, Rgb([0, 255, 0]));

        let hsv = backend.to_hsv(&frame)?;
        let low = backend.threshold(&hsv, &HsvRange::new([0, 120, 100], [10, 255, 255]))?;
        let high = backend.threshold(&hsv, &HsvRange::new([170, 120, 100], [180, 255, 255]))?;
        let red = backend.union(&low, &high)?;

        let values: Vec<u8> = red.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![255, 255, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_crop_outside_rejected() {
        let backend = PixelBackend::new();
        let mask = GrayImage::new(10, 10);
        assert!(backend.crop(&mask, Region::new(5, 5, 10, 10)).is_err());
        assert!(backend.crop(&mask, Region::new(2, 2, 5, 5)).is_ok());
    }

    #[test]
    fn test_union_size_mismatch() {
        let backend = PixelBackend::new();
        assert!(backend.union(&GrayImage::new(2, 2), &GrayImage::new(3, 2)).is_err());
    }

    #[test]
    fn test_empty_mask_has_no_contours() -> Result<()> {
        let backend = PixelBackend::new();
        assert!(backend.find_external_contours(&GrayImage::new(20, 20))?.is_empty());
        Ok(())
    }

    #[test]
    fn test_rectangle_contour() -> Result<()> {
        let backend = PixelBackend::new();
        let mut mask = GrayImage::new(60, 40);
        fill(&mut mask, 10, 5, 26, 21);

        let contours = backend.find_external_contours(&mask)?;
        assert_eq!(contours.len(), 1);
        // Boundary polygon through pixel centres: 25 x 20
        assert_eq!(backend.contour_area(&contours[0]), 500.0);
        assert_eq!(backend.bounding_box(&contours[0]), Region::new(10, 5, 26, 21));
        Ok(())
    }

    #[test]
    fn test_contours_last_discovered_first() -> Result<()> {
        let backend = PixelBackend::new();
        let mut mask = GrayImage::new(80, 40);
        fill(&mut mask, 50, 2, 10, 10);
        fill(&mut mask, 5, 20, 4, 4);

        let contours = backend.find_external_contours(&mask)?;
        assert_eq!(contours.len(), 2);
        assert_eq!(backend.bounding_box(&contours[0]).x, 5);
        assert_eq!(backend.contour_area(&contours[0]), 9.0);
        assert_eq!(backend.bounding_box(&contours[1]).x, 50);
        Ok(())
    }

    #[test]
    fn test_nested_blob_skipped() -> Result<()> {
        let backend = PixelBackend::new();
        let mut mask = GrayImage::new(50, 50);
        // Ring with a 20x20 hole, and a dot inside the hole
        fill(&mut mask, 5, 5, 40, 40);
        for y in 15..35 {
            for x in 15..35 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        fill(&mut mask, 24, 24, 3, 3);

        let contours = backend.find_external_contours(&mask)?;
        assert_eq!(contours.len(), 1);
        assert_eq!(backend.bounding_box(&contours[0]), Region::new(5, 5, 40, 40));
        assert_eq!(backend.contour_area(&contours[0]), 39.0 * 39.0);
        Ok(())
    }

    #[test]
    fn test_degenerate_contours() -> Result<()> {
        let backend = PixelBackend::new();
        let mut mask = GrayImage::new(10, 10);
        mask.put_pixel(7, 1, Luma([255]));
        for i in 2..5 {
            mask.put_pixel(i, i, Luma([255]));
        }

        let contours = backend.find_external_contours(&mask)?;
        assert_eq!(contours.len(), 2);
        for contour in &contours {
            assert_eq!(backend.contour_area(contour), 0.0);
        }
        assert_eq!(backend.bounding_box(&contours[0]), Region::new(2, 2, 3, 3));
        assert_eq!(backend.bounding_box(&contours[1]), Region::new(7, 1, 1, 1));
        Ok(())
    }
}
