//! Synthesis and frame loop configuration.

use crate::error::ConfigError;

/// Oscillator and audio output parameters
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Audio sample rate (Hz), handed to the output device
    pub sample_rate_hz: u32,

    /// Frames per output buffer
    /// 4096 @ 44.1kHz ≈ 93ms
    pub buffer_size: u32,

    /// Frequency at zero pitch bend (Hz)
    pub pitch_base_hz: f64,

    /// Frequency span covered by a full-scale bend (Hz)
    /// Formula: frequency = pitch_base + pitch_bend * pitch_range
    pub pitch_range_hz: f64,

    /// Volume before the first detection, 0..=1
    pub initial_volume: f64,

    /// Hard amplitude ceiling applied on top of volume, 0..=1
    pub max_volume: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            buffer_size: 4096,
            pitch_base_hz: 50.0,
            pitch_range_hz: 2000.0,
            initial_volume: 0.5,
            max_volume: 0.5,
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::invalid(
                "sample_rate_hz",
                "Sample rate must be > 0",
            ));
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::invalid("buffer_size", "Buffer size must be > 0"));
        }
        if !self.pitch_base_hz.is_finite() || self.pitch_base_hz <= 0.0 {
            return Err(ConfigError::invalid(
                "pitch_base_hz",
                format!("Pitch base must be positive, got {}", self.pitch_base_hz),
            ));
        }
        if !self.pitch_range_hz.is_finite() || self.pitch_range_hz < 0.0 {
            return Err(ConfigError::invalid(
                "pitch_range_hz",
                format!("Pitch range must be >= 0, got {}", self.pitch_range_hz),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_volume) {
            return Err(ConfigError::invalid(
                "max_volume",
                format!("Max volume must be within 0..=1, got {}", self.max_volume),
            ));
        }
        Ok(())
    }
}

/// Frame loop scheduling
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Period between frame ticks (milliseconds)
    /// 50 = 20 Hz, the camera polling rate
    pub tick_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
        }
    }
}

impl LoopConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "tick_interval_ms",
                "Tick interval must be > 0",
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }

    /// Ticks needed to cover `secs` seconds (rounded up)
    pub fn ticks_for(&self, secs: f32) -> u64 {
        duration_to_ticks(secs, self.tick_interval_ms)
    }
}

/// Whole ticks covering `secs`, with the duration first rounded to milliseconds
///
/// Live runs and offline renders both count ticks through here so a given
/// `--duration` yields the same number of frames either way.
pub fn duration_to_ticks(secs: f32, tick_interval_ms: u64) -> u64 {
    if !secs.is_finite() || secs <= 0.0 {
        return 0;
    }
    let millis = (f64::from(secs) * 1000.0).round() as u64;
    millis.div_ceil(tick_interval_ms.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SynthConfig::default().validate().is_ok());
        assert!(LoopConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = SynthConfig {
            sample_rate_hz: 0,
            ..SynthConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SynthConfig {
            max_volume: 1.5,
            ..SynthConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SynthConfig {
            pitch_base_hz: f64::NAN,
            ..SynthConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(LoopConfig { tick_interval_ms: 0 }.validate().is_err());
    }

    #[test]
    fn test_ticks_for_duration() {
        let config = LoopConfig::default();
        assert_eq!(config.ticks_for(1.0), 20);
        assert_eq!(config.ticks_for(0.01), 1);
        assert_eq!(config.ticks_for(-2.0), 0);
        assert_eq!(config.ticks_for(f32::NAN), 0);
    }

    #[test]
    fn test_decimal_durations_do_not_gain_a_tick() {
        let config = LoopConfig::default();
        assert_eq!(config.ticks_for(0.15), 3);
        assert_eq!(config.ticks_for(0.3), 6);
        assert_eq!(config.ticks_for(1.1), 22);
        assert_eq!(config.ticks_for(0.151), 4);
    }
}
