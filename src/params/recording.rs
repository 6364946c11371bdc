//! Recording configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::synth::duration_to_ticks;

/// WAV recording configuration (live tap or offline render)
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Output WAV file
    pub audio_path: PathBuf,

    /// Duration to record (seconds), unbounded when absent
    pub duration_secs: Option<f32>,
}

impl RecordingConfig {
    pub fn new(audio_path: impl Into<PathBuf>, duration_secs: Option<f32>) -> Self {
        Self {
            audio_path: audio_path.into(),
            duration_secs,
        }
    }

    /// Number of frame ticks covering the duration at the given tick interval
    pub fn total_ticks(&self, interval: Duration) -> Option<u64> {
        let duration = self.duration_secs?;
        let interval_ms = u64::try_from(interval.as_millis()).ok()?;
        if interval_ms == 0 {
            return None;
        }
        Some(duration_to_ticks(duration, interval_ms))
    }
}
