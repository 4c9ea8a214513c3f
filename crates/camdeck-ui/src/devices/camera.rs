use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use embedded_graphics::{
    image::{Image, ImageRaw, ImageRawLE},
    pixelcolor::Rgb565,
    prelude::*,
};

/// A captured or loaded picture.
///
/// `encoded` carries the bytes that go to storage (JPEG on the device);
/// `pixels` is an RGB565 rendition already scaled for the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub encoded: Vec<u8>,
}

impl Frame {
    /// Build a frame from little-endian RGB565 pixel bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, encoded: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            encoded,
        }
    }

    /// Solid-colour frame, mostly for mocks.
    pub fn filled(width: u32, height: u32, color: Rgb565) -> Self {
        let raw = color.into_storage().to_le_bytes();
        let mut pixels = Vec::with_capacity((width * height * 2) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&raw);
        }
        Self::new(width, height, pixels, Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.pixels.len() == (self.width * self.height * 2) as usize
    }

    /// Blit the preview at `top_left`. Malformed frames are skipped.
    pub fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        top_left: Point,
    ) -> Result<(), D::Error> {
        if !self.is_valid() {
            log::warn!(
                "Skipping malformed frame {}x{} ({} bytes)",
                self.width,
                self.height,
                self.pixels.len()
            );
            return Ok(());
        }
        let raw: ImageRawLE<Rgb565> = ImageRaw::new(&self.pixels, self.width);
        Image::new(&raw, top_left).draw(display)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Sensor failed to initialise or is absent.
    Unavailable,
    /// Frame grab failed.
    CaptureFailed(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Unavailable => write!(f, "Camera not available"),
            CameraError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CameraError {}

/// Frame source.
pub trait Camera {
    fn is_available(&self) -> bool;

    /// Small frame for the live viewport, fetched every tick.
    fn preview(&mut self) -> Result<Frame, CameraError>;

    /// Full capture; `encoded` is what gets saved.
    fn capture(&mut self) -> Result<Frame, CameraError>;
}
