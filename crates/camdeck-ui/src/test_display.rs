//! Test display that allows pixel overdraw.
//!
//! `MockDisplay` from embedded-graphics panics when a pixel is drawn twice,
//! which doesn't work for activities that clear backgrounds then draw on top.
//! This framebuffer allows overdraw and counts drawn pixels so tests can
//! tell full redraws from partial repaints.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

/// RGB565 framebuffer for tests and the scenario harness.
pub struct TestDisplay {
    pixels: Vec<Rgb565>,
    width: u32,
    height: u32,
    drawn: usize,
}

impl TestDisplay {
    /// Create a new test display with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Rgb565::BLACK; (width * height) as usize],
            width,
            height,
            drawn: 0,
        }
    }

    /// Create a display matching the 128x160 panel.
    pub fn default_size() -> Self {
        Self::new(crate::DISPLAY_WIDTH, crate::DISPLAY_HEIGHT)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Pixels written since the last [`TestDisplay::reset_draw_count`].
    pub fn draw_count(&self) -> usize {
        self.drawn
    }

    pub fn reset_draw_count(&mut self) {
        self.drawn = 0;
    }

    /// Number of pixels that are not background black.
    pub fn lit_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p != Rgb565::BLACK).count()
    }

    pub fn count_color(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|p| **p == color).count()
    }

    /// Cheap fingerprint of a rectangular region for before/after comparisons.
    pub fn region_hash(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                let raw = self.pixels[(row * self.width + col) as usize].into_storage();
                hash ^= u64::from(raw);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
        }
        hash
    }
}

impl DrawTarget for TestDisplay {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as u32) < self.width
                && (coord.y as u32) < self.height
            {
                let idx = (coord.y as u32 * self.width + coord.x as u32) as usize;
                self.pixels[idx] = color;
                self.drawn += 1;
            }
        }
        Ok(())
    }
}

impl OriginDimensions for TestDisplay {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
