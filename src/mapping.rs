//! Tracker output to synth controls, plus note naming for display.

use crate::tracking::TrackResult;

/// Control parameters derived from one tracking result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSignal {
    pub playing: bool,

    /// Horizontal position, 0..=1 (left edge = 0)
    pub pitch_bend: f64,

    /// Vertical position, 0..=1 (top edge = loudest)
    pub volume: f64,
}

/// Maps blob positions to pitch bend and volume
///
/// Remembers the last detected position so a lost blob silences the synth
/// without resetting pitch or volume.
#[derive(Debug, Clone)]
pub struct ControlMapper {
    pitch_bend: f64,
    volume: f64,
}

impl ControlMapper {
    pub fn new(initial_volume: f64) -> Self {
        Self {
            pitch_bend: 0.0,
            volume: initial_volume.clamp(0.0, 1.0),
        }
    }

    pub fn map(&mut self, result: &TrackResult, frame_width: u32, frame_height: u32) -> ControlSignal {
        match *result {
            TrackResult::Detected { x, y, .. } if frame_width > 0 && frame_height > 0 => {
                self.pitch_bend = normalized(x / f64::from(frame_width));
                self.volume = normalized(1.0 - y / f64::from(frame_height));
                ControlSignal {
                    playing: true,
                    pitch_bend: self.pitch_bend,
                    volume: self.volume,
                }
            }
            _ => ControlSignal {
                playing: false,
                pitch_bend: self.pitch_bend,
                volume: self.volume,
            },
        }
    }
}

impl Default for ControlMapper {
    fn default() -> Self {
        Self::new(0.5)
    }
}

fn normalized(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// MIDI note number nearest to a frequency (A4 = 440 Hz = 69)
pub fn frequency_to_note_number(frequency: f64) -> Option<i32> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return None;
    }
    Some((12.0 * (frequency / 440.0).log2() + 69.0).round() as i32)
}

/// Display name for a MIDI note number, e.g. `A-4`, `C#5`
///
/// Natural notes are padded with `-` so every name is three characters wide
/// for single-digit octaves.
pub fn note_number_to_note(note: i32) -> String {
    let name = NOTE_NAMES[note.rem_euclid(12) as usize];
    let octave = note.div_euclid(12) - 1;
    let pad = if name.len() < 2 { "-" } else { "" };
    format!("{}{}{}", name, pad, octave)
}

pub fn frequency_to_note(frequency: f64) -> Option<String> {
    frequency_to_note_number(frequency).map(note_number_to_note)
}

/// Frequency rounded and zero-padded to four digits, e.g. `0440 Hz`
pub fn format_frequency(frequency: f64) -> String {
    let hz = if frequency.is_finite() {
        frequency.round().max(0.0) as u64
    } else {
        0
    };
    format!("{:04} Hz", hz)
}
