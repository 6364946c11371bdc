//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, Hz, milliseconds)
//! - Documented ranges and meanings
//! - Clamping or validation at the boundary

mod recording;
mod synth;
mod tracking;

// Re-export all types
pub use recording::RecordingConfig;
pub use synth::{LoopConfig, SynthConfig};
pub use tracking::{ColorSpec, TrackingConfig};
