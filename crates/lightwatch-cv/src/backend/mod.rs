//! Implementations of `ImageOps`

pub mod pixel;
#[cfg(feature = "opencv")]
pub mod cv;

pub use pixel::PixelBackend;
#[cfg(feature = "opencv")]
pub use cv::OpenCvBackend;
