use chroma_theremin::audio::{SynthHandle, Voice};
use chroma_theremin::capture::{Frame, FrameSource};
use chroma_theremin::display::NullDisplay;
use chroma_theremin::error::CaptureError;
use chroma_theremin::frame_loop::{FrameLoop, TickOutcome};
use chroma_theremin::mapping::ControlMapper;
use chroma_theremin::params::{ColorSpec, SynthConfig, TrackingConfig};
use chroma_theremin::tracking::{ColorTracker, TrackResult};

/// 100x100 black frame with a 6x6 block of `rgb` whose center is (50, 50)
fn centered_block_frame(rgb: [u8; 3]) -> Frame {
    let (width, height) = (100usize, 100usize);
    let mut data = vec![0u8; width * height * 4];
    for pixel in data.chunks_mut(4) {
        pixel[3] = 255;
    }
    for y in 47..53 {
        for x in 47..53 {
            let i = (y * width + x) * 4;
            data[i..i + 3].copy_from_slice(&rgb);
        }
    }
    Frame::new(width as u32, height as u32, data).unwrap()
}

fn scenario_config() -> TrackingConfig {
    let mut config = TrackingConfig::default().with_color(ColorSpec::new(100, 100, 100));
    config.set_color_offset(10);
    config.set_size_offset(5);
    config.set_sampling_step(1);
    config
}

struct Repeat(Frame);

impl FrameSource for Repeat {
    fn current_frame(&mut self) -> Result<Frame, CaptureError> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_centered_block_scenario() {
    let frame = centered_block_frame([100, 100, 100]);
    let config = scenario_config();

    let result = ColorTracker::new().track(&frame, &config);
    let TrackResult::Detected { x, y, weight, .. } = result else {
        panic!("expected detection, got {:?}", result);
    };
    assert_eq!(weight, 36);
    assert!((x - 50.0).abs() <= 0.5);
    assert!((y - 50.0).abs() <= 0.5);

    let signal = ControlMapper::default().map(&result, 100, 100);
    assert!(signal.playing);
    assert!((signal.pitch_bend - 0.5).abs() <= 0.01);
    assert!((signal.volume - 0.5).abs() <= 0.01);
}

#[test]
fn test_pipeline_drives_audible_voice() {
    let synth = SynthConfig::default();
    let handle = SynthHandle::new(&synth);
    let mut frame_loop = FrameLoop::new(
        Repeat(centered_block_frame([104, 96, 100])),
        NullDisplay,
        scenario_config(),
        ControlMapper::default(),
        handle.clone(),
    );
    let mut voice = Voice::new(&synth, synth.sample_rate_hz, handle);

    let outcome = frame_loop.tick();
    let TickOutcome::Playing { frequency, .. } = outcome else {
        panic!("expected playing, got {:?}", outcome);
    };
    // bend 0.495 -> 50 + 990 Hz
    assert!((frequency - 1040.0).abs() < 1e-6);

    let samples = {
        let mut buf = vec![0.0f32; synth.buffer_size as usize];
        voice.fill(&mut buf);
        buf
    };
    let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    // volume 0.505 * max volume 0.5
    assert!((peak - 0.2525).abs() < 0.01);
}

#[test]
fn test_black_frame_keeps_voice_silent() {
    let synth = SynthConfig::default();
    let handle = SynthHandle::new(&synth);
    let mut frame_loop = FrameLoop::new(
        Repeat(Frame::solid(100, 100, [0, 0, 0, 255])),
        NullDisplay,
        scenario_config(),
        ControlMapper::default(),
        handle.clone(),
    );
    let mut voice = Voice::new(&synth, synth.sample_rate_hz, handle);

    assert_eq!(frame_loop.tick(), TickOutcome::Silent);

    let mut buf = vec![1.0f32; 512];
    voice.fill(&mut buf);
    assert!(buf.iter().all(|&s| s == 0.0));
}
