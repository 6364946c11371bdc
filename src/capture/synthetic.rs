//! Generated scene: a colored square drifting over a black background.
//!
//! Stands in for a camera so the pipeline can run (and be recorded) on a
//! machine with no video device.

use image::Rgba;

use super::{Frame, FrameSource};
use crate::error::CaptureError;
use crate::params::ColorSpec;

/// Lissajous-path square of a given color
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    /// Frame width (pixels)
    pub width: u32,

    /// Frame height (pixels)
    pub height: u32,

    /// Color of the moving square
    pub color: ColorSpec,

    /// Side length of the square (pixels)
    pub block_size: u32,

    /// Ticks reported as not ready before the first frame (camera warm-up)
    pub warmup_ticks: u64,

    /// Every `period` ticks the square is hidden for `length` ticks
    pub gap: Option<(u64, u64)>,

    /// Path speed (radians per tick, horizontal and vertical)
    pub speed: (f64, f64),

    tick: u64,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, color: ColorSpec) -> Self {
        Self {
            width,
            height,
            color,
            block_size: 24,
            warmup_ticks: 5,
            gap: Some((100, 20)),
            speed: (0.035, 0.055),
            tick: 0,
        }
    }

    /// Top-left corner of the square for a given visible tick
    fn block_origin(&self, tick: u64) -> (u32, u32) {
        let t = tick as f64;
        let span_x = self.width.saturating_sub(self.block_size) as f64;
        let span_y = self.height.saturating_sub(self.block_size) as f64;

        let x = span_x * 0.5 * (1.0 + (t * self.speed.0).sin());
        let y = span_y * 0.5 * (1.0 + (t * self.speed.1 + 0.5).sin());
        (x.round() as u32, y.round() as u32)
    }

    fn hidden(&self, tick: u64) -> bool {
        match self.gap {
            Some((period, length)) if period > 0 => tick % period >= period - length.min(period),
            _ => false,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn current_frame(&mut self) -> Result<Frame, CaptureError> {
        let tick = self.tick;
        self.tick += 1;

        if tick < self.warmup_ticks {
            return Err(CaptureError::NotReady);
        }

        let mut frame = Frame::solid(self.width, self.height, [0, 0, 0, 255]);
        let visible_tick = tick - self.warmup_ticks;
        if self.hidden(visible_tick) {
            return Ok(frame);
        }

        let (x0, y0) = self.block_origin(visible_tick);
        let paint = Rgba([self.color.r, self.color.g, self.color.b, 255]);
        let image = frame.image_mut();
        for y in y0..(y0 + self.block_size).min(self.height) {
            for x in x0..(x0 + self.block_size).min(self.width) {
                image.put_pixel(x, y, paint);
            }
        }

        Ok(frame)
    }
}
