//! Sine synthesis and audio output.
//!
//! The frame loop writes controls through a [`SynthHandle`]; a [`Voice`]
//! owned by the output callback (or the offline renderer) turns them into
//! phase-continuous samples.

mod offline;
mod oscillator;
mod recorder;
mod shared;
mod system;

// Re-export public types
pub use offline::render_offline;
pub use oscillator::{Oscillator, OscillatorState};
pub use recorder::WavRecorder;
pub use shared::{SynthControls, SynthHandle, Voice};
pub use system::AudioSystem;
