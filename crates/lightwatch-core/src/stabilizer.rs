//! Temporal smoothing of detected regions
//!
//! A `RegionStabilizer` keeps the last `history_size` regions reported for one
//! signal color. While the history is still filling up (cold) the raw region
//! is passed through; once it is full (warm) the componentwise mean of the
//! window is reported instead. An empty region wipes the history.

use crate::region::Region;
use crate::ring::SlidingWindow;
use log::trace;

pub const DEFAULT_HISTORY_SIZE: usize = 8;

/// Warm-up state of a stabilizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilizerPhase {
    Cold,
    Warm,
}

/// Sliding-window mean over recent regions
#[derive(Debug, Clone)]
pub struct RegionStabilizer {
    history: SlidingWindow<Region>,
}

impl RegionStabilizer {
    pub fn new(history_size: usize) -> Self {
        Self {
            history: SlidingWindow::new(history_size),
        }
    }

    /// Feed the region observed in the current frame and get the region to report
    pub fn update(&mut self, current: Region) -> Region {
        if current.is_empty() {
            if !self.history.is_empty() {
                trace!("stabilizer reset after {} samples", self.history.len());
            }
            self.history.clear();
            return Region::empty();
        }

        let was_full = self.history.is_full();
        if let Some(evicted) = self.history.push(current) {
            trace!("stabilizer evicted {}", evicted);
        }

        if !self.history.is_full() {
            return current;
        }
        if !was_full {
            trace!("stabilizer warm with {} samples", self.history.len());
        }

        self.mean()
    }

    /// Drop all history, as at the start of a new session
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn phase(&self) -> StabilizerPhase {
        if self.history.is_full() {
            StabilizerPhase::Warm
        } else {
            StabilizerPhase::Cold
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_size(&self) -> usize {
        self.history.capacity()
    }

    /// Integer mean of every field, truncated toward zero
    fn mean(&self) -> Region {
        let count = self.history.len() as i64;
        let (mut x, mut y, mut width, mut height) = (0i64, 0i64, 0i64, 0i64);
        for region in self.history.iter() {
            x += region.x as i64;
            y += region.y as i64;
            width += region.width as i64;
            height += region.height as i64;
        }

        Region::new(
            (x / count) as i32,
            (y / count) as i32,
            (width / count) as i32,
            (height / count) as i32,
        )
    }
}

impl Default for RegionStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}
