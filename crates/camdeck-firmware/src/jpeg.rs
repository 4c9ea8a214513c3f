//! JPEG to display-ready RGB565.

use camdeck_ui::Frame;
use image::ImageFormat;

/// Largest area a photo or preview is drawn into (the viewport above the
/// button bar).
pub const VIEWPORT_WIDTH: u32 = 128;
pub const VIEWPORT_HEIGHT: u32 = 140;

/// Decodes `jpeg` and scales it to fit the viewport, keeping the aspect
/// ratio. The encoded bytes are kept in [`Frame::encoded`].
pub fn decode_for_display(jpeg: Vec<u8>) -> Result<Frame, image::ImageError> {
    let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg)?;
    let scaled = if decoded.width() > VIEWPORT_WIDTH || decoded.height() > VIEWPORT_HEIGHT {
        decoded.thumbnail(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    } else {
        decoded
    };
    let rgb = scaled.to_rgb8();

    let mut pixels = Vec::with_capacity((rgb.width() * rgb.height() * 2) as usize);
    for pixel in rgb.pixels() {
        let [r, g, b] = pixel.0;
        pixels.extend_from_slice(&rgb565(r, g, b).to_le_bytes());
    }
    Ok(Frame::new(rgb.width(), rgb.height(), pixels, jpeg))
}

fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}
