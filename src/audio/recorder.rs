//! WAV capture of synthesized output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::AudioError;

/// 32-bit float WAV writer
pub struct WavRecorder {
    writer: hound::WavWriter<BufWriter<File>>,
    samples_written: u64,
}

impl WavRecorder {
    pub fn create(path: impl AsRef<Path>, sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let writer = hound::WavWriter::create(path, spec)?;
        Ok(Self {
            writer,
            samples_written: 0,
        })
    }

    /// Append interleaved samples
    pub fn write(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        for &sample in samples {
            self.writer.write_sample(sample)?;
        }
        self.samples_written += samples.len() as u64;
        Ok(())
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Flush and patch the header; dropping without this loses error reporting
    pub fn finalize(self) -> Result<(), AudioError> {
        self.writer.finalize()?;
        Ok(())
    }
}
