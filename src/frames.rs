//! Frame source reading still images in arrival order

use anyhow::{bail, Context, Result};
use image::RgbImage;
use lightwatch_cv::utils::ImageUtils;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions read as frames
pub const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Ordered list of frame files, decoded lazily one at a time
#[derive(Debug, Clone)]
pub struct FrameSource {
    paths: Vec<PathBuf>,
}

impl FrameSource {
    /// Build a source from CLI inputs: a single directory is listed, files are taken as given.
    /// The final list is sorted lexicographically, which is the arrival order.
    pub fn from_inputs(inputs: &[PathBuf]) -> Result<Self> {
        let mut paths = Vec::new();
        for input in inputs {
            if input.is_dir() {
                paths.extend(Self::list_dir(input)?);
            } else if input.is_file() {
                paths.push(input.clone());
            } else {
                bail!("Input not found: {:?}", input);
            }
        }
        paths.sort();
        Ok(Self { paths })
    }

    fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut frames = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))? {
            let path = entry?.path();
            if path.is_file() && Self::is_frame_file(&path) {
                frames.push(path);
            }
        }
        Ok(frames)
    }

    pub fn is_frame_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Decoded frames paired with their path; decode errors are yielded, not skipped
    pub fn frames(&self) -> impl Iterator<Item = (&Path, Result<RgbImage>)> + '_ {
        self.paths
            .iter()
            .map(|path| (path.as_path(), ImageUtils::load_rgb(path)))
    }
}
