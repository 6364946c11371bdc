//! Frames replayed from a directory of still images.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Frame, FrameSource};
use crate::error::{CaptureError, ConfigError, ThereminError};

/// Cycles through every decodable image in a directory, sorted by file name
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    cursor: usize,
}

impl ImageSequence {
    /// Scan `dir` for files the `image` crate recognises by extension
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, ThereminError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && image::ImageFormat::from_path(&path).is_ok() {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(ConfigError::invalid(
                "frames",
                format!("No images found in {}", dir.display()),
            )
            .into());
        }

        paths.sort();
        info!("Frame sequence: {} images from {}", paths.len(), dir.display());

        Ok(Self { paths, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequence {
    fn current_frame(&mut self) -> Result<Frame, CaptureError> {
        let path = &self.paths[self.cursor];
        self.cursor = (self.cursor + 1) % self.paths.len();

        debug!("Decoding {}", path.display());
        let image = image::open(path)?.to_rgba8();
        Ok(Frame::from_image(image))
    }
}
