//! Lightwatch Computer Vision Library
//!
//! Locates a traffic light in a stream of frames and reports its active
//! color. The per-frame pipeline (HSV masks, closing, contour search in fixed
//! zones) sits behind the `ImageOps` trait so the pixel work can be done by
//! the pure-Rust backend or, with the `opencv` feature, by OpenCV.

pub mod backend;
pub mod detection;
pub mod utils;
pub mod zone;

// Re-export commonly used types
pub use backend::PixelBackend;
#[cfg(feature = "opencv")]
pub use backend::OpenCvBackend;
pub use detection::{ColorProfile, ColorSignalExtractor, ConfigError, DetectionConfig, FrameAnnotator, HsvRange};
pub use lightwatch_core::{Detection, Region, SignalColor};
pub use traits::ImageOps;
pub use zone::ZoneSpec;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;

    /// Image-processing primitives the signal extractor is built from.
    ///
    /// Masks are binary images. Contours are the outer boundaries of the
    /// connected foreground components of a mask; components nested inside a
    /// hole of another component are not reported. Contours are listed in
    /// OpenCV order: the component discovered last in a raster scan comes first.
    pub trait ImageOps {
        type Frame;
        type Hsv;
        type Mask;
        type Contour;

        /// (width, height) in pixels
        fn frame_size(&self, frame: &Self::Frame) -> Result<(i32, i32)>;

        /// Convert to 8-bit HSV with hue in 0..=180
        fn to_hsv(&self, frame: &Self::Frame) -> Result<Self::Hsv>;

        /// Pixels inside the inclusive range on every channel
        fn threshold(&self, hsv: &Self::Hsv, range: &HsvRange) -> Result<Self::Mask>;

        fn union(&self, a: &Self::Mask, b: &Self::Mask) -> Result<Self::Mask>;

        /// Morphological closing with a `kernel_size` square elliptical element
        fn close(&self, mask: &Self::Mask, kernel_size: u32) -> Result<Self::Mask>;

        /// Copy of the part of the mask covered by `zone`
        fn crop(&self, mask: &Self::Mask, zone: Region) -> Result<Self::Mask>;

        fn find_external_contours(&self, mask: &Self::Mask) -> Result<Vec<Self::Contour>>;

        fn contour_area(&self, contour: &Self::Contour) -> f64;

        fn bounding_box(&self, contour: &Self::Contour) -> Region;
    }
}
