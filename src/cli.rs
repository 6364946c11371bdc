//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::params::{ColorSpec, LoopConfig, RecordingConfig, SynthConfig, TrackingConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "chroma-theremin")]
#[command(about = "Theremin played by moving a colored object in front of the camera", long_about = None)]
pub struct Args {
    /// Directory of frame images to replay (synthetic scene when omitted)
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// Color to track, as #rrggbb
    #[arg(long, default_value = "#b127b9")]
    pub color: String,

    /// Per-channel color tolerance (+/-)
    #[arg(long, value_name = "0-255", default_value_t = 50)]
    pub color_offset: i64,

    /// Minimum blob weight (sampled pixels) to count as a detection
    #[arg(long, default_value_t = 5)]
    pub size_offset: u64,

    /// Scan every Nth pixel
    #[arg(long, value_name = "PIXELS", default_value_t = 4)]
    pub step: usize,

    /// Max pixel distance for a match to join the blob
    #[arg(long, value_name = "PIXELS", default_value_t = 20.0)]
    pub radius: f64,

    /// Frame tick period (milliseconds)
    #[arg(long, value_name = "MS", default_value_t = 50)]
    pub interval_ms: u64,

    /// Output sample rate (Hz)
    #[arg(long, value_name = "HZ", default_value_t = 44100)]
    pub sample_rate: u32,

    /// Output buffer size (frames)
    #[arg(long, value_name = "FRAMES", default_value_t = 4096)]
    pub buffer_size: u32,

    /// Flip frames horizontally before tracking (mirror view)
    #[arg(long)]
    pub mirror: bool,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Also record the live output to a WAV file
    #[arg(long, value_name = "WAV", conflicts_with = "no_audio")]
    pub record: Option<PathBuf>,

    /// Render to a WAV file without an audio device (requires --duration)
    #[arg(long, value_name = "WAV", requires = "duration", conflicts_with = "record")]
    pub offline: Option<PathBuf>,

    /// Track and display without opening an audio device
    #[arg(long)]
    pub no_audio: bool,

    /// Ignore setting commands on stdin
    #[arg(long)]
    pub no_stdin: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Tracking config from the command-line values
    pub fn tracking_config(&self) -> Result<TrackingConfig, ConfigError> {
        let mut config = TrackingConfig::default().with_color(ColorSpec::from_hex(&self.color)?);

        if !(0..=255).contains(&self.color_offset) {
            return Err(ConfigError::invalid(
                "color-offset",
                format!("must be within 0..=255, got {}", self.color_offset),
            ));
        }
        if self.step == 0 {
            return Err(ConfigError::invalid("step", "must be >= 1"));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(ConfigError::invalid(
                "radius",
                format!("must be >= 0, got {}", self.radius),
            ));
        }

        config.set_color_offset(self.color_offset);
        config.set_size_offset(self.size_offset);
        config.set_sampling_step(self.step);
        config.set_cluster_radius(self.radius);
        config.validate()?;
        Ok(config)
    }

    pub fn synth_config(&self) -> Result<SynthConfig, ConfigError> {
        let config = SynthConfig {
            sample_rate_hz: self.sample_rate,
            buffer_size: self.buffer_size,
            ..SynthConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn loop_config(&self) -> Result<LoopConfig, ConfigError> {
        let config = LoopConfig {
            tick_interval_ms: self.interval_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Recording target: offline render takes precedence over the live tap
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.offline
            .as_ref()
            .or(self.record.as_ref())
            .map(|path| RecordingConfig::new(path.clone(), self.duration))
    }
}
