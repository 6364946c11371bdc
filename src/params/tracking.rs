//! Color tracking configuration.

use std::fmt;

use crate::error::ConfigError;

/// Target color to track (8-bit RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb` (case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ConfigError::InvalidColor(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Closed-interval membership test: every channel within `target ± offset`
    ///
    /// Bounds are computed in signed space, so a window reaching below 0 or
    /// above 255 simply accepts the whole low/high end of that channel.
    pub fn matches(&self, pixel: [u8; 3], offset: u8) -> bool {
        let offset = i16::from(offset);
        let within = |value: u8, target: u8| {
            let delta = i16::from(value) - i16::from(target);
            -offset <= delta && delta <= offset
        };

        within(pixel[0], self.r) && within(pixel[1], self.g) && within(pixel[2], self.b)
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Color tracking parameters, adjustable at runtime
///
/// Every setter clamps into the documented range; only the color setter can
/// reject input, and it keeps the previous color when it does.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    /// Color to detect
    color: ColorSpec,

    /// Per-channel tolerance (+/-), 0..=255
    /// A bigger offset will detect a bigger range of colors
    color_offset: u8,

    /// Detect only blobs whose weight (sampled pixel count) exceeds this
    size_offset: u32,

    /// Pixel stride of the scan (1 = every pixel)
    sampling_step: usize,

    /// Max distance (pixels) from the running centroid for a match to be absorbed
    cluster_radius: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            color: ColorSpec::new(0xb1, 0x27, 0xb9),
            color_offset: 50,
            size_offset: 5,
            sampling_step: 4, // We don't need to look at every pixel
            cluster_radius: 20.0,
        }
    }
}

impl TrackingConfig {
    pub fn color(&self) -> ColorSpec {
        self.color
    }

    pub fn color_offset(&self) -> u8 {
        self.color_offset
    }

    pub fn size_offset(&self) -> u32 {
        self.size_offset
    }

    pub fn sampling_step(&self) -> usize {
        self.sampling_step
    }

    pub fn cluster_radius(&self) -> f64 {
        self.cluster_radius
    }

    pub fn set_color(&mut self, color: ColorSpec) {
        self.color = color;
    }

    /// Set the target color from a hex string; the old color is kept on error
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ConfigError> {
        self.color = ColorSpec::from_hex(hex)?;
        Ok(())
    }

    pub fn set_color_offset(&mut self, offset: i64) {
        self.color_offset = offset.clamp(0, i64::from(u8::MAX)) as u8;
    }

    pub fn set_size_offset(&mut self, size_offset: u64) {
        self.size_offset = size_offset.min(u64::from(u32::MAX)) as u32;
    }

    pub fn set_sampling_step(&mut self, step: usize) {
        self.sampling_step = step.max(1);
    }

    /// Non-finite radii are ignored
    pub fn set_cluster_radius(&mut self, radius: f64) {
        if radius.is_finite() {
            self.cluster_radius = radius.max(0.0);
        }
    }

    /// Check the invariants the setters maintain
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_step == 0 {
            return Err(ConfigError::invalid(
                "sampling_step",
                "Sampling step must be >= 1",
            ));
        }
        if !self.cluster_radius.is_finite() || self.cluster_radius < 0.0 {
            return Err(ConfigError::invalid(
                "cluster_radius",
                format!("Cluster radius must be >= 0, got {}", self.cluster_radius),
            ));
        }
        Ok(())
    }

    /// Builder-style variant used when assembling the config from CLI input
    pub fn with_color(mut self, color: ColorSpec) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            ColorSpec::from_hex("#b127b9").unwrap(),
            ColorSpec::new(0xb1, 0x27, 0xb9)
        );
        assert_eq!(
            ColorSpec::from_hex("FF0080").unwrap(),
            ColorSpec::new(255, 0, 128)
        );
        assert_eq!(ColorSpec::new(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn test_malformed_hex_rejected() {
        for bad in ["", "#", "#12345", "#1234567", "#gg0000", "red"] {
            assert!(ColorSpec::from_hex(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_bad_color_keeps_previous() {
        let mut config = TrackingConfig::default();
        config.set_color_hex("#102030").unwrap();

        let err = config.set_color_hex("#zz2030").unwrap_err();
        assert_eq!(err, ConfigError::InvalidColor("#zz2030".to_string()));
        assert_eq!(config.color(), ColorSpec::new(0x10, 0x20, 0x30));
    }

    #[test]
    fn test_window_is_closed() {
        let target = ColorSpec::new(100, 100, 100);

        assert!(target.matches([100, 100, 100], 0));
        assert!(target.matches([110, 90, 110], 10));
        assert!(!target.matches([111, 100, 100], 10));
        assert!(!target.matches([100, 89, 100], 10));
    }

    #[test]
    fn test_window_saturates_at_channel_limits() {
        let target = ColorSpec::new(250, 5, 128);
        assert!(target.matches([255, 0, 128], 10));
    }

    #[test]
    fn test_larger_offset_never_shrinks_match_set() {
        let target = ColorSpec::new(120, 60, 200);
        let pixels = [
            [120, 60, 200],
            [130, 55, 190],
            [90, 60, 200],
            [0, 0, 0],
            [255, 255, 255],
            [150, 90, 230],
        ];

        for offset in 0..u8::MAX {
            for pixel in pixels {
                if target.matches(pixel, offset) {
                    assert!(target.matches(pixel, offset + 1));
                }
            }
        }
    }

    #[test]
    fn test_setters_clamp() {
        let mut config = TrackingConfig::default();

        config.set_color_offset(-4);
        assert_eq!(config.color_offset(), 0);
        config.set_color_offset(1000);
        assert_eq!(config.color_offset(), 255);

        config.set_sampling_step(0);
        assert_eq!(config.sampling_step(), 1);

        config.set_cluster_radius(-3.0);
        assert_eq!(config.cluster_radius(), 0.0);
        config.set_cluster_radius(f64::NAN);
        assert_eq!(config.cluster_radius(), 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(TrackingConfig::default().validate().is_ok());

        let config = TrackingConfig {
            sampling_step: 0,
            ..TrackingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = TrackingConfig {
            cluster_radius: f64::INFINITY,
            ..TrackingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
