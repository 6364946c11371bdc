//! Display side effects of the frame loop.
//!
//! Fire-and-forget: nothing here is ever read back by the tracker or synth.

use tracing::{debug, info};

use crate::mapping::format_frequency;

pub trait DisplaySink {
    /// Tracked point position (frame pixels) and its color
    fn show_tracked_point(&mut self, x: f64, y: f64, rgb: [u8; 3]);

    fn show_frequency(&mut self, hz: f64);

    fn show_note(&mut self, name: &str);
}

impl<D: DisplaySink + ?Sized> DisplaySink for Box<D> {
    fn show_tracked_point(&mut self, x: f64, y: f64, rgb: [u8; 3]) {
        (**self).show_tracked_point(x, y, rgb)
    }

    fn show_frequency(&mut self, hz: f64) {
        (**self).show_frequency(hz)
    }

    fn show_note(&mut self, name: &str) {
        (**self).show_note(name)
    }
}

/// Logs display updates; the note is only logged when it changes
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    last_note: Option<String>,
    last_frequency: Option<String>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for ConsoleDisplay {
    fn show_tracked_point(&mut self, x: f64, y: f64, rgb: [u8; 3]) {
        debug!(
            "Tracked point ({:.1}, {:.1}) rgb({},{},{})",
            x, y, rgb[0], rgb[1], rgb[2]
        );
    }

    fn show_frequency(&mut self, hz: f64) {
        self.last_frequency = Some(format_frequency(hz));
    }

    fn show_note(&mut self, name: &str) {
        if self.last_note.as_deref() == Some(name) {
            return;
        }
        info!(
            "{}  {}",
            name,
            self.last_frequency.as_deref().unwrap_or("---- Hz")
        );
        self.last_note = Some(name.to_string());
    }
}

/// Discards every update (headless runs that only want audio)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn show_tracked_point(&mut self, _x: f64, _y: f64, _rgb: [u8; 3]) {}

    fn show_frequency(&mut self, _hz: f64) {}

    fn show_note(&mut self, _name: &str) {}
}
