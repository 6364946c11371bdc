//! Frame scanner producing a [`TrackResult`].

use glam::DVec2;

use super::{Blob, TrackResult};
use crate::capture::Frame;
use crate::params::{ColorSpec, TrackingConfig};

/// Stateless color-blob scanner
///
/// Holds no per-frame state; each [`ColorTracker::scan`] starts from scratch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorTracker;

impl ColorTracker {
    pub fn new() -> Self {
        Self
    }

    /// Scan with the thresholds from a [`TrackingConfig`]
    pub fn track(&self, frame: &Frame, config: &TrackingConfig) -> TrackResult {
        let blob = self.scan(
            frame,
            config.color(),
            config.color_offset(),
            config.sampling_step(),
            config.cluster_radius(),
        );

        match blob {
            // Noise gate: small blobs are indistinguishable from no blob
            Some(blob) if blob.weight > config.size_offset() => TrackResult::Detected {
                x: blob.centroid.x,
                y: blob.centroid.y,
                weight: blob.weight,
                color: blob.last_color,
            },
            _ => TrackResult::NoMatch,
        }
    }

    /// Single pass over every `step`-th pixel, growing at most one blob
    ///
    /// The first match seeds the blob; later matches within `cluster_radius`
    /// of the running centroid are averaged in, the rest are dropped.
    pub fn scan(
        &self,
        frame: &Frame,
        target: ColorSpec,
        offset: u8,
        step: usize,
        cluster_radius: f64,
    ) -> Option<Blob> {
        let width = frame.width() as usize;
        if width == 0 {
            return None;
        }

        let mut blob: Option<Blob> = None;

        for index in (0..frame.pixel_count()).step_by(step.max(1)) {
            let rgb = frame.rgb_at(index);
            if !target.matches(rgb, offset) {
                continue;
            }

            let point = DVec2::new((index % width) as f64, (index / width) as f64);
            match blob.as_mut() {
                None => blob = Some(Blob::seed(point, rgb)),
                Some(blob) => {
                    blob.absorb(point, rgb, cluster_radius);
                }
            }
        }

        blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: ColorSpec = ColorSpec::new(100, 100, 100);

    fn paint_block(frame: &mut Frame, x0: u32, y0: u32, size: u32, rgb: [u8; 3]) {
        let image = frame.image_mut();
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                image.put_pixel(x, y, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
            }
        }
    }

    fn config(size_offset: u64, step: usize) -> TrackingConfig {
        let mut config = TrackingConfig::default().with_color(TARGET);
        config.set_color_offset(10);
        config.set_size_offset(size_offset);
        config.set_sampling_step(step);
        config
    }

    #[test]
    fn test_black_frame_is_no_match() {
        let frame = Frame::solid(32, 32, [0, 0, 0, 255]);
        assert_eq!(
            ColorTracker::new().track(&frame, &config(0, 1)),
            TrackResult::NoMatch
        );
    }

    #[test]
    fn test_empty_frame_is_no_match() {
        let frame = Frame::new(0, 0, Vec::new()).unwrap();
        assert_eq!(
            ColorTracker::new().track(&frame, &config(0, 1)),
            TrackResult::NoMatch
        );
    }

    #[test]
    fn test_solid_target_frame_detected() {
        let frame = Frame::solid(8, 8, [100, 100, 100, 255]);
        let result = ColorTracker::new().track(&frame, &config(5, 1));
        assert!(result.is_detected());
    }

    #[test]
    fn test_centered_block() {
        let mut frame = Frame::solid(100, 100, [0, 0, 0, 255]);
        paint_block(&mut frame, 47, 47, 6, [100, 100, 100]);

        match ColorTracker::new().track(&frame, &config(5, 1)) {
            TrackResult::Detected {
                x,
                y,
                weight,
                color,
            } => {
                assert_eq!(weight, 36);
                assert!((x - 49.5).abs() < 1e-9);
                assert!((y - 49.5).abs() < 1e-9);
                assert_eq!(color, [100, 100, 100]);
            }
            TrackResult::NoMatch => panic!("block not detected"),
        }
    }

    #[test]
    fn test_weight_must_exceed_size_offset() {
        let mut frame = Frame::solid(20, 20, [0, 0, 0, 255]);
        paint_block(&mut frame, 5, 5, 2, [100, 100, 100]);

        // four matching pixels
        let tracker = ColorTracker::new();
        assert!(tracker.track(&frame, &config(3, 1)).is_detected());
        assert_eq!(tracker.track(&frame, &config(4, 1)), TrackResult::NoMatch);
    }

    #[test]
    fn test_second_cluster_ignored() {
        let mut frame = Frame::solid(100, 20, [0, 0, 0, 255]);
        paint_block(&mut frame, 2, 2, 4, [100, 100, 100]);
        paint_block(&mut frame, 80, 2, 4, [105, 95, 100]);

        let blob = ColorTracker::new()
            .scan(&frame, TARGET, 10, 1, 20.0)
            .unwrap();
        assert_eq!(blob.weight, 16);
        assert!(blob.centroid.x < 10.0);
        assert_eq!(blob.last_color, [100, 100, 100]);
    }

    #[test]
    fn test_stride_samples_subset() {
        let frame = Frame::solid(10, 10, [100, 100, 100, 255]);
        let blob = ColorTracker::new()
            .scan(&frame, TARGET, 10, 4, 1000.0)
            .unwrap();
        // indices 0, 4, ..., 96
        assert_eq!(blob.weight, 25);
    }

    #[test]
    fn test_last_color_is_most_recent_match() {
        let mut frame = Frame::solid(10, 1, [0, 0, 0, 255]);
        paint_block(&mut frame, 2, 0, 1, [95, 100, 100]);
        paint_block(&mut frame, 4, 0, 1, [108, 100, 100]);

        let blob = ColorTracker::new()
            .scan(&frame, TARGET, 10, 1, 20.0)
            .unwrap();
        assert_eq!(blob.last_color, [108, 100, 100]);
        assert!((blob.centroid.x - 3.0).abs() < 1e-9);
    }
}
