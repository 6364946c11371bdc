//! Audio output stream driving the oscillator.

use std::path::Path;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use tracing::{info, warn};

use super::recorder::WavRecorder;
use super::shared::{SynthHandle, Voice};
use crate::error::AudioError;
use crate::params::SynthConfig;

type SharedRecorder = Arc<Mutex<Option<WavRecorder>>>;

/// Audio system pulling oscillator buffers at the device's cadence
pub struct AudioSystem {
    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    /// Optional WAV tap of everything sent to the device
    recorder: SharedRecorder,

    sample_rate: u32,
    channels: u16,
}

impl AudioSystem {
    /// Open the default output device and start streaming
    ///
    /// Asks for the configured sample rate and a fixed buffer size, then
    /// falls back to the device's default buffer size, then to its default
    /// rate. Whatever is negotiated here stays fixed for the stream's life.
    pub fn new(config: &SynthConfig, handle: SynthHandle) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let default_config = device
            .default_output_config()
            .map_err(|e| AudioError::UnsupportedConfig(e.to_string()))?;
        let channels = default_config.channels();

        let candidates = [
            (config.sample_rate_hz, BufferSize::Fixed(config.buffer_size)),
            (config.sample_rate_hz, BufferSize::Default),
            (default_config.sample_rate().0, BufferSize::Default),
        ];

        let recorder: SharedRecorder = Arc::new(Mutex::new(None));
        let mut last_error = None;

        for (sample_rate, buffer_size) in candidates {
            let stream_config = StreamConfig {
                channels,
                sample_rate: SampleRate(sample_rate),
                buffer_size,
            };
            let voice = Voice::new(config, sample_rate, handle.clone());

            match build_stream(&device, &stream_config, voice, Arc::clone(&recorder)) {
                Ok(stream) => {
                    stream
                        .play()
                        .map_err(|e| AudioError::StreamStart(e.to_string()))?;

                    info!(
                        "Audio: {} @ {}Hz, {} channel(s), buffer {:?}",
                        device.name().unwrap_or_else(|_| "Unknown".to_string()),
                        sample_rate,
                        channels,
                        stream_config.buffer_size
                    );

                    return Ok(Self {
                        _stream: stream,
                        recorder,
                        sample_rate,
                        channels,
                    });
                }
                Err(e) => {
                    warn!(
                        "Output config {}Hz / {:?} refused: {}",
                        sample_rate, stream_config.buffer_size, e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(AudioError::StreamBuild(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Tap the output into a WAV file at the negotiated rate and channel count
    ///
    /// A failure leaves the stream playing without a recording.
    pub fn start_recording(&self, path: &Path) -> Result<(), AudioError> {
        attach_recorder(&self.recorder, path, self.sample_rate, self.channels)?;
        info!("Recording audio to {}", path.display());
        Ok(())
    }

    /// Stop recording and finalize the WAV file, if one is open
    pub fn finish_recording(&self) -> Result<(), AudioError> {
        let recorder = self
            .recorder
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match recorder {
            Some(recorder) => recorder.finalize(),
            None => Ok(()),
        }
    }
}

fn attach_recorder(
    slot: &SharedRecorder,
    path: &Path,
    sample_rate: u32,
    channels: u16,
) -> Result<(), AudioError> {
    let wav = WavRecorder::create(path, sample_rate, channels)?;
    *slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(wav);
    Ok(())
}

fn build_stream(
    device: &cpal::Device,
    stream_config: &StreamConfig,
    mut voice: Voice,
    recorder: SharedRecorder,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    let channels = stream_config.channels as usize;

    device.build_output_stream(
        stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            voice.fill_interleaved(data, channels);

            // Contended only while the recording is being finalized
            if let Ok(mut guard) = recorder.try_lock() {
                let failed = guard.as_mut().and_then(|wav| wav.write(data).err());
                if let Some(e) = failed {
                    warn!("Recording stopped: {}", e);
                    *guard = None;
                }
            }
        },
        |err| warn!("Audio stream error: {}", err),
        None,
    )
}
