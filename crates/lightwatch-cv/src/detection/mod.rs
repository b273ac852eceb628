//! High-level detection module

pub mod annotator;
pub mod config;
pub mod extractor;

pub use annotator::FrameAnnotator;
pub use config::{ColorProfile, ConfigError, DetectionConfig, HsvRange};
pub use extractor::ColorSignalExtractor;
