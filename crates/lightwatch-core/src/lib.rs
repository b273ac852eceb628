//! Lightwatch core types
//!
//! Frame regions, signal detections and the temporal stabilizer. This crate
//! has no imaging dependency; pixel work lives in `lightwatch-cv`.

pub mod region;
pub mod ring;
pub mod signal;
pub mod stabilizer;

pub use region::Region;
pub use signal::{Detection, SignalColor};
pub use stabilizer::{DEFAULT_HISTORY_SIZE, RegionStabilizer, StabilizerPhase};
