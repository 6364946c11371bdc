//! Offline rendering: run the frame loop on virtual time and write the
//! synthesized audio straight to a WAV file.

use std::time::Duration;

use tracing::info;

use super::recorder::WavRecorder;
use super::shared::Voice;
use crate::capture::FrameSource;
use crate::display::DisplaySink;
use crate::error::AudioError;
use crate::frame_loop::FrameLoop;

/// Run `ticks` frame ticks, pulling one interval's worth of samples after each
///
/// Sample counts are derived from the running total so fractional
/// samples-per-tick never accumulate drift. Returns the mono sample count.
pub fn render_offline<S: FrameSource, D: DisplaySink>(
    frame_loop: &mut FrameLoop<S, D>,
    voice: &mut Voice,
    recorder: &mut WavRecorder,
    sample_rate: u32,
    interval: Duration,
    ticks: u64,
) -> Result<u64, AudioError> {
    let samples_per_tick = f64::from(sample_rate) * interval.as_secs_f64();
    let mut buffer = Vec::new();
    let mut written: u64 = 0;

    for tick in 0..ticks {
        frame_loop.tick();

        let target = ((tick + 1) as f64 * samples_per_tick).round() as u64;
        let count = (target - written) as usize;
        buffer.resize(count, 0.0);
        voice.fill(&mut buffer);
        recorder.write(&buffer)?;
        written = target;
    }

    info!(
        "Rendered {} ticks, {:.2}s of audio",
        ticks,
        written as f64 / f64::from(sample_rate)
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SynthHandle;
    use crate::capture::SyntheticSource;
    use crate::display::NullDisplay;
    use crate::mapping::ControlMapper;
    use crate::params::{ColorSpec, SynthConfig, TrackingConfig};

    #[test]
    fn test_renders_expected_length_with_audible_section() {
        let color = ColorSpec::new(0, 180, 255);
        let config = SynthConfig::default();
        let handle = SynthHandle::new(&config);

        let mut source = SyntheticSource::new(64, 48, color);
        source.warmup_ticks = 2;
        let mut frame_loop = FrameLoop::new(
            source,
            NullDisplay,
            TrackingConfig::default().with_color(color),
            ControlMapper::default(),
            handle.clone(),
        );
        let mut voice = Voice::new(&config, 8000, handle);

        let path = std::env::temp_dir().join(format!(
            "chroma-theremin-offline-{}.wav",
            std::process::id()
        ));
        let mut recorder = WavRecorder::create(&path, 8000, 1).unwrap();

        // 30ms at 8kHz = 240 samples per tick
        let written = render_offline(
            &mut frame_loop,
            &mut voice,
            &mut recorder,
            8000,
            Duration::from_millis(30),
            10,
        )
        .unwrap();
        recorder.finalize().unwrap();
        assert_eq!(written, 2400);

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 2400);
        // warm-up ticks are silent, tracked ticks are not
        assert!(samples[..480].iter().all(|&s| s == 0.0));
        assert!(samples[480..].iter().any(|&s| s != 0.0));

        std::fs::remove_file(&path).unwrap();
    }
}
