//! Video frames and the sources that produce them.
//!
//! The frame loop polls a [`FrameSource`] once per tick. A source that has
//! nothing to offer returns [`CaptureError::NotReady`] (or `Failed`), and the
//! tick is skipped.

mod image_sequence;
mod synthetic;

pub use image_sequence::ImageSequence;
pub use synthetic::SyntheticSource;

use image::{imageops, Rgba, RgbaImage};

use crate::error::CaptureError;

/// One captured RGBA frame, read-only once built
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbaImage,
}

impl Frame {
    /// Wrap a raw RGBA buffer of exactly `width * height * 4` bytes
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CaptureError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CaptureError::BadBuffer {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        let actual = data.len();
        let image = RgbaImage::from_raw(width, height, data).ok_or(CaptureError::BadBuffer {
            width,
            height,
            expected,
            actual,
        })?;
        Ok(Self { image })
    }

    /// Frame filled with a single color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel_count(&self) -> usize {
        self.image.width() as usize * self.image.height() as usize
    }

    /// RGB of the pixel at a linear (row-major) index
    pub fn rgb_at(&self, index: usize) -> [u8; 3] {
        let offset = index * 4;
        let data = self.image.as_raw();
        [data[offset], data[offset + 1], data[offset + 2]]
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Horizontally flipped copy (what a mirrored preview shows)
    pub fn mirrored(&self) -> Self {
        Self {
            image: imageops::flip_horizontal(&self.image),
        }
    }

    /// Mutable access for sources that paint into a frame
    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }
}

/// Polled by the frame loop for the latest frame
pub trait FrameSource {
    fn current_frame(&mut self) -> Result<Frame, CaptureError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn current_frame(&mut self) -> Result<Frame, CaptureError> {
        (**self).current_frame()
    }
}

/// Flips every frame of the wrapped source
pub struct Mirrored<S> {
    inner: S,
}

impl<S: FrameSource> Mirrored<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: FrameSource> FrameSource for Mirrored<S> {
    fn current_frame(&mut self) -> Result<Frame, CaptureError> {
        self.inner.current_frame().map(|frame| frame.mirrored())
    }
}
