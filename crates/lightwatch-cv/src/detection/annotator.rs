//! Per-frame entry point combining extraction and stabilization

use super::config::DetectionConfig;
use super::extractor::ColorSignalExtractor;
use crate::backend::PixelBackend;
use crate::traits::ImageOps;
use crate::Result;
use lightwatch_core::{Detection, Region, RegionStabilizer, SignalColor};
use log::debug;

/// Turns each frame into the final (color, region) report.
///
/// Only green regions are smoothed. Red regions are reported raw so the stop
/// signal is never delayed by the averaging window; this leaves the red box
/// free to jitter between frames.
pub struct FrameAnnotator<B: ImageOps = PixelBackend> {
    extractor: ColorSignalExtractor<B>,
    green_stabilizer: RegionStabilizer,
    frames_seen: u64,
}

impl<B: ImageOps> FrameAnnotator<B> {
    /// Start a session; the stabilizer begins empty
    pub fn new(backend: B, config: DetectionConfig) -> Self {
        let green_stabilizer = RegionStabilizer::new(config.history_size);
        Self {
            extractor: ColorSignalExtractor::new(backend, config),
            green_stabilizer,
            frames_seen: 0,
        }
    }

    /// Process the next frame in arrival order
    pub fn annotate(&mut self, frame: &B::Frame) -> Result<Detection> {
        let raw = self.extractor.extract(frame)?;
        self.frames_seen += 1;

        let detection = match raw.color {
            SignalColor::Red => raw,
            SignalColor::Green => raw.with_region(self.green_stabilizer.update(raw.region)),
            SignalColor::Unknown => {
                self.green_stabilizer.update(Region::empty());
                Detection::unknown()
            }
        };

        debug!(
            "frame {}: {} raw {} -> {} (green history {}/{}, {:?})",
            self.frames_seen,
            detection.color,
            raw.region,
            detection.region,
            self.green_stabilizer.history_len(),
            self.green_stabilizer.history_size(),
            self.green_stabilizer.phase()
        );
        Ok(detection)
    }

    /// Forget all temporal state, as at the start of a new stream
    pub fn reset(&mut self) {
        self.green_stabilizer.reset();
        self.frames_seen = 0;
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn green_stabilizer(&self) -> &RegionStabilizer {
        &self.green_stabilizer
    }

    pub fn config(&self) -> &DetectionConfig {
        self.extractor.config()
    }
}

impl FrameAnnotator<PixelBackend> {
    pub fn with_config(config: DetectionConfig) -> Self {
        Self::new(PixelBackend::new(), config)
    }
}

impl Default for FrameAnnotator<PixelBackend> {
    fn default() -> Self {
        Self::with_config(DetectionConfig::default())
    }
}
