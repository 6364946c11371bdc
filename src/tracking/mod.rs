//! Single-blob color tracking.
//!
//! One streaming pass over a frame finds the running centroid of pixels near
//! the target color. Only one blob is ever grown per frame.

mod tracker;

pub use tracker::ColorTracker;

use glam::DVec2;

/// Accumulator for one frame scan; never outlives the scan
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    /// Running mean of absorbed pixel positions
    pub centroid: DVec2,

    /// Number of absorbed pixels (always >= 1)
    pub weight: u32,

    /// RGB of the most recently absorbed pixel (display only)
    pub last_color: [u8; 3],
}

impl Blob {
    /// Seed a blob at its first matching pixel
    pub fn seed(point: DVec2, color: [u8; 3]) -> Self {
        Self {
            centroid: point,
            weight: 1,
            last_color: color,
        }
    }

    /// Fold a point into the centroid if it lies within `radius`
    ///
    /// Returns whether the point was absorbed.
    pub fn absorb(&mut self, point: DVec2, color: [u8; 3], radius: f64) -> bool {
        if self.centroid.distance(point) >= radius {
            return false;
        }

        // Incremental mean: equal to the batch mean of every absorbed point
        self.centroid += (point - self.centroid) / f64::from(self.weight + 1);
        self.weight += 1;
        self.last_color = color;
        true
    }
}

/// Outcome of scanning one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackResult {
    /// Nothing matched, or the blob was too small to trust
    NoMatch,

    Detected {
        x: f64,
        y: f64,
        weight: u32,
        color: [u8; 3],
    },
}

impl TrackResult {
    pub fn is_detected(&self) -> bool {
        matches!(self, TrackResult::Detected { .. })
    }
}
