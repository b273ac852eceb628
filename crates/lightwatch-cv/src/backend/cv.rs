//! OpenCV-backed `ImageOps` (enabled with the `opencv` feature)

use crate::detection::config::HsvRange;
use crate::traits::ImageOps;
use crate::Result;
use anyhow::Context;
use lightwatch_core::Region;
use opencv::{
    core::{self, Mat, Point, Rect, Scalar, Size, Vector},
    imgproc,
    prelude::*,
};

/// Backend working on BGR `Mat` frames, as delivered by OpenCV video capture
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvBackend;

impl OpenCvBackend {
    pub fn new() -> Self {
        Self
    }

    fn scalar(values: [u8; 3]) -> Scalar {
        Scalar::new(values[0] as f64, values[1] as f64, values[2] as f64, 0.0)
    }
}

impl ImageOps for OpenCvBackend {
    type Frame = Mat;
    type Hsv = Mat;
    type Mask = Mat;
    type Contour = Vector<Point>;

    fn frame_size(&self, frame: &Mat) -> Result<(i32, i32)> {
        let size = frame.size().context("Failed to read frame size")?;
        Ok((size.width, size.height))
    }

    fn to_hsv(&self, frame: &Mat) -> Result<Mat> {
        let mut hsv = Mat::default();
        imgproc::cvt_color(frame, &mut hsv, imgproc::COLOR_BGR2HSV, 0)
            .context("Failed to convert frame to HSV")?;
        Ok(hsv)
    }

    fn threshold(&self, hsv: &Mat, range: &HsvRange) -> Result<Mat> {
        let mut mask = Mat::default();
        core::in_range(hsv, &Self::scalar(range.low), &Self::scalar(range.high), &mut mask)
            .context("Failed to threshold HSV frame")?;
        Ok(mask)
    }

    fn union(&self, a: &Mat, b: &Mat) -> Result<Mat> {
        let mut mask = Mat::default();
        core::bitwise_or(a, b, &mut mask, &core::no_array()).context("Failed to merge masks")?;
        Ok(mask)
    }

    fn close(&self, mask: &Mat, kernel_size: u32) -> Result<Mat> {
        let side = kernel_size.max(1) as i32;
        let kernel = imgproc::get_structuring_element(
            imgproc::MORPH_ELLIPSE,
            Size::new(side, side),
            Point::new(-1, -1),
        )?;

        let mut closed = Mat::default();
        imgproc::morphology_ex(
            mask,
            &mut closed,
            imgproc::MORPH_CLOSE,
            &kernel,
            Point::new(-1, -1),
            1,
            core::BORDER_CONSTANT,
            imgproc::morphology_default_border_value()?,
        )
        .context("Failed to close mask")?;
        Ok(closed)
    }

    fn crop(&self, mask: &Mat, zone: Region) -> Result<Mat> {
        let rect = Rect::new(zone.x, zone.y, zone.width, zone.height);
        let roi = Mat::roi(mask, rect).with_context(|| format!("Failed to take zone {}", zone))?;
        Ok(roi.try_clone()?)
    }

    fn find_external_contours(&self, mask: &Mat) -> Result<Vec<Vector<Point>>> {
        let mut contours = Vector::<Vector<Point>>::new();
        imgproc::find_contours(
            mask,
            &mut contours,
            imgproc::RETR_EXTERNAL,
            imgproc::CHAIN_APPROX_SIMPLE,
            Point::new(0, 0),
        )
        .context("Failed to find contours")?;
        Ok(contours.to_vec())
    }

    fn contour_area(&self, contour: &Vector<Point>) -> f64 {
        imgproc::contour_area(contour, false).unwrap_or(0.0)
    }

    fn bounding_box(&self, contour: &Vector<Point>) -> Region {
        imgproc::bounding_rect(contour)
            .map(|rect| Region::new(rect.x, rect.y, rect.width, rect.height))
            .unwrap_or_default()
    }
}
