//! Phase-accumulating sine oscillator.

use std::f64::consts::TAU;

use super::shared::SynthControls;
use crate::params::SynthConfig;

/// Everything the oscillator needs to produce its next sample
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorState {
    /// Position within the current cycle, always in [0, 1)
    pub phase: f64,

    /// Output sample rate (Hz)
    pub sample_rate: f64,

    /// Frequency at zero bend (Hz)
    pub pitch_base: f64,

    /// Bend in [-1, 1]
    pub pitch_bend: f64,

    /// Frequency span of a full-scale bend (Hz)
    pub pitch_range: f64,

    /// Volume in [0, 1]
    pub volume: f64,

    /// Amplitude ceiling in [0, 1]
    pub max_volume: f64,

    pub playing: bool,
}

impl OscillatorState {
    pub fn frequency(&self) -> f64 {
        self.pitch_base + self.pitch_bend * self.pitch_range
    }
}

/// Pure sine generator with continuous phase across buffer pulls
///
/// Pitch and volume may change between pulls; the phase carries over, so a
/// parameter change bends the waveform instead of restarting it. While muted
/// the phase is frozen and pulls return silence.
#[derive(Debug, Clone)]
pub struct Oscillator {
    state: OscillatorState,
}

impl Oscillator {
    /// Create a muted oscillator at the given output rate
    pub fn new(config: &SynthConfig, sample_rate: u32) -> Self {
        Self {
            state: OscillatorState {
                phase: 0.0,
                sample_rate: f64::from(sample_rate.max(1)),
                pitch_base: config.pitch_base_hz,
                pitch_bend: 0.0,
                pitch_range: config.pitch_range_hz,
                volume: config.initial_volume.clamp(0.0, 1.0),
                max_volume: config.max_volume.clamp(0.0, 1.0),
                playing: false,
            },
        }
    }

    pub fn state(&self) -> &OscillatorState {
        &self.state
    }

    pub fn frequency(&self) -> f64 {
        self.state.frequency()
    }

    pub fn phase(&self) -> f64 {
        self.state.phase
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn set_pitch_bend(&mut self, bend: f64) {
        if bend.is_finite() {
            self.state.pitch_bend = bend.clamp(-1.0, 1.0);
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_finite() {
            self.state.volume = volume.clamp(0.0, 1.0);
        }
    }

    pub fn mute(&mut self) {
        self.state.playing = false;
    }

    pub fn unmute(&mut self) {
        self.state.playing = true;
    }

    /// Take over a control snapshot written by the frame loop
    pub fn apply(&mut self, controls: SynthControls) {
        self.set_pitch_bend(controls.pitch_bend);
        self.set_volume(controls.volume);
        self.state.playing = controls.playing;
    }

    pub fn pull_samples(&mut self, n: usize) -> Vec<f32> {
        let mut out = vec![0.0; n];
        self.fill(&mut out);
        out
    }

    /// Overwrite `out` with the next `out.len()` samples
    pub fn fill(&mut self, out: &mut [f32]) {
        if !self.state.playing {
            out.fill(0.0);
            return;
        }

        let amplitude = self.state.volume * self.state.max_volume;
        let increment = self.state.frequency() / self.state.sample_rate;
        let mut phase = self.state.phase;

        for sample in out.iter_mut() {
            *sample = (amplitude * (phase * TAU).sin()) as f32;
            phase = wrap_phase(phase + increment);
        }

        self.state.phase = phase;
    }
}

/// Bring any finite phase back into [0, 1)
fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase - phase.floor();
    if wrapped >= 1.0 || !wrapped.is_finite() {
        0.0
    } else {
        wrapped
    }
}
