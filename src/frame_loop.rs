//! Fixed-cadence pipeline: capture → track → map → synth controls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::audio::SynthHandle;
use crate::capture::FrameSource;
use crate::control::SettingsReceiver;
use crate::display::DisplaySink;
use crate::error::CaptureError;
use crate::mapping::{frequency_to_note, ControlMapper};
use crate::params::TrackingConfig;
use crate::tracking::{ColorTracker, TrackResult};

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No frame this tick; nothing changed
    Skipped,

    /// Frame scanned, no usable blob; synth muted
    Silent,

    /// Blob tracked; synth playing at `frequency`
    Playing { x: f64, y: f64, frequency: f64 },
}

/// Frame loop wiring a source, the tracker, the mapper and the synth
pub struct FrameLoop<S, D> {
    source: S,
    display: D,
    config: TrackingConfig,
    tracker: ColorTracker,
    mapper: ControlMapper,
    synth: SynthHandle,
    settings: Option<SettingsReceiver>,
    was_playing: bool,
}

impl<S: FrameSource, D: DisplaySink> FrameLoop<S, D> {
    pub fn new(
        source: S,
        display: D,
        config: TrackingConfig,
        mapper: ControlMapper,
        synth: SynthHandle,
    ) -> Self {
        Self {
            source,
            display,
            config,
            tracker: ColorTracker::new(),
            mapper,
            synth,
            settings: None,
            was_playing: false,
        }
    }

    /// Accept runtime setting changes from this receiver
    pub fn with_settings(mut self, settings: SettingsReceiver) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut TrackingConfig {
        &mut self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn synth(&self) -> &SynthHandle {
        &self.synth
    }

    /// Run the pipeline once
    pub fn tick(&mut self) -> TickOutcome {
        if let Some(settings) = &self.settings {
            settings.drain_into(&mut self.config);
        }

        let frame = match self.source.current_frame() {
            Ok(frame) => frame,
            Err(CaptureError::NotReady) => {
                debug!("Frame not ready, skipping tick");
                return TickOutcome::Skipped;
            }
            Err(e) => {
                debug!("Capture failed, skipping tick: {}", e);
                return TickOutcome::Skipped;
            }
        };

        let result = self.tracker.track(&frame, &self.config);
        let signal = self.mapper.map(&result, frame.width(), frame.height());
        self.synth.apply(&signal);

        if signal.playing != self.was_playing {
            info!(
                "{}",
                if signal.playing {
                    "Color detected, playing"
                } else {
                    "Color lost, muted"
                }
            );
            self.was_playing = signal.playing;
        }

        match result {
            TrackResult::Detected { x, y, color, .. } => {
                let frequency = self.synth.frequency();
                self.display.show_tracked_point(x, y, color);
                self.display.show_frequency(frequency);
                if let Some(note) = frequency_to_note(frequency) {
                    self.display.show_note(&note);
                }
                TickOutcome::Playing { x, y, frequency }
            }
            TrackResult::NoMatch => TickOutcome::Silent,
        }
    }

    /// Tick every `interval` until `stop` is set or `limit` ticks have run
    ///
    /// Best-effort cadence: the sleep is shortened by the time the tick took.
    /// Returns the number of ticks run.
    pub fn run(&mut self, interval: Duration, limit: Option<u64>, stop: &AtomicBool) -> u64 {
        let mut ticks = 0;

        while !stop.load(Ordering::Relaxed) && limit.map_or(true, |limit| ticks < limit) {
            let started = Instant::now();
            self.tick();
            ticks += 1;
            thread::sleep(interval.saturating_sub(started.elapsed()));
        }

        ticks
    }
}

/// Shared stop flag for [`FrameLoop::run`]
pub fn stop_flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}
