//! Control state shared between the frame loop and the audio callback.
//!
//! The frame loop is the only writer of pitch bend, volume and the playing
//! flag; the audio side is the only owner of the oscillator phase. The lock
//! around the controls is held just long to copy three fields.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::oscillator::Oscillator;
use crate::mapping::ControlSignal;
use crate::params::SynthConfig;

/// Parameter tuple written by the frame loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthControls {
    pub pitch_bend: f64,
    pub volume: f64,
    pub playing: bool,
}

/// Writer side of the synth controls (cheap to clone)
#[derive(Debug, Clone)]
pub struct SynthHandle {
    controls: Arc<Mutex<SynthControls>>,
    pitch_base: f64,
    pitch_range: f64,
}

impl SynthHandle {
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            controls: Arc::new(Mutex::new(SynthControls {
                pitch_bend: 0.0,
                volume: config.initial_volume.clamp(0.0, 1.0),
                playing: false,
            })),
            pitch_base: config.pitch_base_hz,
            pitch_range: config.pitch_range_hz,
        }
    }

    // Controls are plain values, so a panic elsewhere cannot leave them torn
    fn lock(&self) -> MutexGuard<'_, SynthControls> {
        self.controls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current controls
    pub fn snapshot(&self) -> SynthControls {
        *self.lock()
    }

    /// Write a whole control signal at once, so readers never see a mix
    pub fn apply(&self, signal: &ControlSignal) {
        let mut controls = self.lock();
        controls.playing = signal.playing;
        if signal.pitch_bend.is_finite() {
            controls.pitch_bend = signal.pitch_bend.clamp(-1.0, 1.0);
        }
        if signal.volume.is_finite() {
            controls.volume = signal.volume.clamp(0.0, 1.0);
        }
    }

    pub fn set_pitch_bend(&self, bend: f64) {
        if bend.is_finite() {
            self.lock().pitch_bend = bend.clamp(-1.0, 1.0);
        }
    }

    pub fn set_volume(&self, volume: f64) {
        if volume.is_finite() {
            self.lock().volume = volume.clamp(0.0, 1.0);
        }
    }

    pub fn mute(&self) {
        self.lock().playing = false;
    }

    pub fn unmute(&self) {
        self.lock().playing = true;
    }

    /// Frequency the oscillator will play for the current bend (Hz)
    pub fn frequency(&self) -> f64 {
        self.pitch_base + self.snapshot().pitch_bend * self.pitch_range
    }
}

/// Audio-side owner of the oscillator
///
/// Lives inside the output callback (or the offline renderer) and never
/// waits on the frame loop beyond the snapshot copy.
pub struct Voice {
    oscillator: Oscillator,
    handle: SynthHandle,
    scratch: Vec<f32>,
}

impl Voice {
    pub fn new(config: &SynthConfig, sample_rate: u32, handle: SynthHandle) -> Self {
        Self {
            oscillator: Oscillator::new(config, sample_rate),
            handle,
            scratch: Vec::with_capacity(config.buffer_size as usize),
        }
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Fill a mono buffer
    pub fn fill(&mut self, out: &mut [f32]) {
        let controls = self.handle.snapshot();
        self.oscillator.apply(controls);
        self.oscillator.fill(out);
    }

    /// Fill an interleaved buffer, same sample on every channel
    pub fn fill_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let frames = data.len() / channels;

        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.resize(frames, 0.0);
        self.fill(&mut scratch);

        for (frame, &sample) in data.chunks_mut(channels).zip(&scratch) {
            frame.fill(sample);
        }
        // trailing partial frame, if the host ever hands one over
        for sample in data.iter_mut().skip(frames * channels) {
            *sample = 0.0;
        }

        self.scratch = scratch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_writes_all_fields() {
        let handle = SynthHandle::new(&SynthConfig::default());
        handle.apply(&ControlSignal {
            playing: true,
            pitch_bend: 0.25,
            volume: 0.8,
        });

        let controls = handle.snapshot();
        assert!(controls.playing);
        assert_eq!(controls.pitch_bend, 0.25);
        assert_eq!(controls.volume, 0.8);
        assert_eq!(handle.frequency(), 550.0);
    }

    #[test]
    fn test_apply_clamps() {
        let handle = SynthHandle::new(&SynthConfig::default());
        handle.apply(&ControlSignal {
            playing: true,
            pitch_bend: 4.0,
            volume: -2.0,
        });

        let controls = handle.snapshot();
        assert_eq!(controls.pitch_bend, 1.0);
        assert_eq!(controls.volume, 0.0);
    }

    #[test]
    fn test_voice_follows_handle() {
        let config = SynthConfig::default();
        let handle = SynthHandle::new(&config);
        let mut voice = Voice::new(&config, 44100, handle.clone());

        let mut buf = vec![1.0; 256];
        voice.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));

        handle.set_pitch_bend(0.5);
        handle.set_volume(1.0);
        handle.unmute();
        voice.fill(&mut buf);
        assert!(buf.iter().any(|&s| s != 0.0));
        assert_eq!(voice.oscillator().frequency(), 1050.0);

        handle.mute();
        let phase = voice.oscillator().phase();
        voice.fill(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));
        assert_eq!(voice.oscillator().phase(), phase);
    }

    #[test]
    fn test_interleaved_duplicates_channels() {
        let config = SynthConfig::default();
        let handle = SynthHandle::new(&config);
        handle.unmute();
        handle.set_pitch_bend(0.1);
        let mut voice = Voice::new(&config, 44100, handle);

        let mut data = vec![0.0; 64 * 2];
        voice.fill_interleaved(&mut data, 2);
        for frame in data.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(data.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_writer_and_reader_on_separate_threads() {
        let config = SynthConfig {
            initial_volume: 0.0,
            ..SynthConfig::default()
        };
        let handle = SynthHandle::new(&config);
        let writer = handle.clone();

        let thread = std::thread::spawn(move || {
            for i in 0..1000 {
                let value = f64::from(i % 2);
                writer.apply(&ControlSignal {
                    playing: true,
                    pitch_bend: value,
                    volume: value,
                });
            }
        });

        let mut voice = Voice::new(&config, 44100, handle.clone());
        let mut buf = vec![0.0; 128];
        for _ in 0..200 {
            let controls = handle.snapshot();
            // bend and volume are always written together
            assert_eq!(controls.pitch_bend, controls.volume);
            voice.fill(&mut buf);
            assert!((0.0..1.0).contains(&voice.oscillator().phase()));
        }

        thread.join().unwrap();
    }
}
