//! Elliptical closing on `GrayImage` masks

use image::{GrayImage, Luma};
use imageproc::morphology::{Mask, grayscale_close};

/// Largest side `imageproc` accepts for a structuring mask
pub const MAX_KERNEL_SIZE: u32 = 511;

/// Ellipse inscribed in a square of side `size`, drawn the way
/// `getStructuringElement(MORPH_ELLIPSE)` draws it.
///
/// Even sizes are rounded up to the next odd side so the element stays
/// symmetric about its centre pixel and closing never shifts a blob.
pub fn ellipse(size: u32) -> GrayImage {
    let side = (size.max(1) | 1).min(MAX_KERNEL_SIZE);
    let r = (side / 2) as i32;
    let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

    let mut element = GrayImage::new(side, side);
    for i in 0..side as i32 {
        let dy = i - r;
        let dx = (r as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i32;
        for j in (r - dx).max(0)..=(r + dx).min(side as i32 - 1) {
            element.put_pixel(j as u32, i as u32, Luma([255]));
        }
    }
    element
}

/// Dilation followed by erosion: fills small gaps and merges nearby fragments
pub fn close(mask: &GrayImage, kernel_size: u32) -> GrayImage {
    let element = ellipse(kernel_size);
    let centre = (element.width() / 2) as u8;
    grayscale_close(mask, &Mask::from_image(&element, centre, centre))
}
