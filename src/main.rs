//! Chroma theremin - play a sine voice by waving a colored object at the camera
//!
//! Horizontal position bends the pitch, vertical position sets the volume.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chroma_theremin::{
    audio::{render_offline, AudioSystem, SynthHandle, Voice, WavRecorder},
    capture::{FrameSource, ImageSequence, Mirrored, SyntheticSource},
    cli::Args,
    control::{settings_channel, SettingCommand, SettingsSender},
    display::ConsoleDisplay,
    frame_loop::{stop_flag, FrameLoop},
    mapping::ControlMapper,
    params::RecordingConfig,
};

/// Size of the generated scene when no frames directory is given
const SYNTHETIC_SIZE: (u32, u32) = (320, 240);

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let tracking = args.tracking_config()?;
    let synth = args.synth_config()?;
    let loop_config = args.loop_config()?;
    let interval = loop_config.interval();

    info!(
        "Tracking {} (offset {}, size {}), tick {}ms",
        tracking.color(),
        tracking.color_offset(),
        tracking.size_offset(),
        loop_config.tick_interval_ms
    );

    let source: Box<dyn FrameSource> = match &args.frames {
        Some(dir) => Box::new(ImageSequence::open(dir)?),
        None => {
            info!("No frames directory, using the synthetic scene");
            Box::new(SyntheticSource::new(
                SYNTHETIC_SIZE.0,
                SYNTHETIC_SIZE.1,
                tracking.color(),
            ))
        }
    };
    let source: Box<dyn FrameSource> = if args.mirror {
        Box::new(Mirrored::new(source))
    } else {
        source
    };

    let handle = SynthHandle::new(&synth);
    let mut frame_loop = FrameLoop::new(
        source,
        ConsoleDisplay::new(),
        tracking,
        ControlMapper::new(synth.initial_volume),
        handle.clone(),
    );

    // Offline render: virtual time, no device
    if let Some(path) = &args.offline {
        let recording = RecordingConfig::new(path.clone(), args.duration);
        let ticks = recording.total_ticks(interval).unwrap_or(0);

        let mut voice = Voice::new(&synth, synth.sample_rate_hz, handle);
        let mut recorder = WavRecorder::create(&recording.audio_path, synth.sample_rate_hz, 1)?;
        render_offline(
            &mut frame_loop,
            &mut voice,
            &mut recorder,
            synth.sample_rate_hz,
            interval,
            ticks,
        )?;
        recorder.finalize()?;
        info!("Wrote {}", recording.audio_path.display());
        return Ok(());
    }

    let stop = stop_flag();

    if !args.no_stdin {
        let (tx, rx) = settings_channel();
        spawn_stdin_reader(tx, Arc::clone(&stop));
        frame_loop = frame_loop.with_settings(rx);
        info!("Type 'color #rrggbb', 'offset N', 'size N', 'step N', 'radius N' or 'quit'");
    }

    // Audio failure is reported once; tracking carries on in silence
    let audio = if args.no_audio {
        None
    } else {
        match AudioSystem::new(&synth, handle) {
            Ok(audio) => Some(audio),
            Err(e) => {
                error!("Audio unavailable, continuing without sound: {}", e);
                None
            }
        }
    };

    // A bad recording path only loses the recording, not the live tone
    if let (Some(audio), Some(recording)) = (&audio, args.recording_config()) {
        if let Err(e) = audio.start_recording(&recording.audio_path) {
            error!(
                "Cannot record to {}: {}",
                recording.audio_path.display(),
                e
            );
        }
    }

    let limit = args.duration.map(|secs| loop_config.ticks_for(secs));

    info!("Chroma theremin is running");
    let ticks = frame_loop.run(interval, limit, &stop);
    info!("Stopped after {} ticks", ticks);

    if let Some(audio) = audio {
        audio.finish_recording()?;
    }

    Ok(())
}

/// Forward setting commands typed on stdin to the frame loop
fn spawn_stdin_reader(tx: SettingsSender, stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "q" {
                stop.store(true, Ordering::Relaxed);
                break;
            }

            match line.parse::<SettingCommand>() {
                Ok(command) => {
                    if !tx.send(command) {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
    });
}
