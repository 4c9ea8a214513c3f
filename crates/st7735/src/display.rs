//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::command::*;
use crate::config::{Config, Dimensions, Rotation};
use crate::interface::DisplayInterface;

/// Pixels sent per SPI write while streaming.
const CHUNK_PIXELS: usize = 64;

/// Power, frame-rate and gamma tuning for red/green-tab 1.8" panels.
const PANEL_TUNING: &[(u8, &[u8])] = &[
    (FRAME_RATE_NORMAL, &[0x01, 0x2C, 0x2D]),
    (FRAME_RATE_IDLE, &[0x01, 0x2C, 0x2D]),
    (FRAME_RATE_PARTIAL, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D]),
    (INVERSION_CONTROL, &[0x07]),
    (POWER_CONTROL_1, &[0xA2, 0x02, 0x84]),
    (POWER_CONTROL_2, &[0xC5]),
    (POWER_CONTROL_3, &[0x0A, 0x00]),
    (POWER_CONTROL_4, &[0x8A, 0x2A]),
    (POWER_CONTROL_5, &[0x8A, 0xEE]),
    (VCOM_CONTROL, &[0x0E]),
    (
        GAMMA_POSITIVE,
        &[
            0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01,
            0x03, 0x10,
        ],
    ),
    (
        GAMMA_NEGATIVE,
        &[
            0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00,
            0x02, 0x10,
        ],
    ),
];

/// Core display driver for the ST7735
///
/// Writes go straight to the controller's frame memory; there is no local
/// frame buffer. With the `graphics` feature this type is also an
/// embedded-graphics `DrawTarget`.
pub struct Display<I>
where
    I: DisplayInterface,
{
    interface: I,
    config: Config,
    sleeping: bool,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            sleeping: true,
        }
    }

    /// Hardware reset, software reset and full initialization.
    /// Leaves the panel awake with the display on.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), I::Error> {
        self.interface.reset(delay)?;
        self.command(SOFT_RESET, &[])?;
        delay.delay_ms(150);
        self.command(SLEEP_OUT, &[])?;
        delay.delay_ms(255);
        self.sleeping = false;

        for (command, data) in PANEL_TUNING {
            self.command(*command, data)?;
        }

        let inversion = if self.config.inverted {
            INVERSION_ON
        } else {
            INVERSION_OFF
        };
        self.command(inversion, &[])?;
        self.command(MEMORY_ACCESS_CONTROL, &[self.config.madctl()])?;
        self.command(PIXEL_FORMAT, &[PIXEL_FORMAT_16BIT])?;

        self.command(NORMAL_MODE_ON, &[])?;
        delay.delay_ms(10);
        self.command(DISPLAY_ON, &[])?;
        delay.delay_ms(100);

        let dims = self.config.rotated_dimensions();
        log::info!(
            "st7735 ready: {}x{} {:?}",
            dims.cols,
            dims.rows,
            self.config.rotation
        );
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), I::Error> {
        self.config.rotation = rotation;
        self.command(MEMORY_ACCESS_CONTROL, &[self.config.madctl()])
    }

    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), I::Error> {
        self.config.inverted = inverted;
        self.command(if inverted { INVERSION_ON } else { INVERSION_OFF }, &[])
    }

    /// Blank the panel without touching frame memory
    pub fn set_display_on(&mut self, on: bool) -> Result<(), I::Error> {
        self.command(if on { DISPLAY_ON } else { DISPLAY_OFF }, &[])
    }

    /// Enter sleep mode. Frame memory is retained.
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), I::Error> {
        if self.sleeping {
            return Ok(());
        }
        self.command(SLEEP_IN, &[])?;
        delay.delay_ms(5);
        self.sleeping = true;
        Ok(())
    }

    pub fn wake<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), I::Error> {
        if !self.sleeping {
            return Ok(());
        }
        self.command(SLEEP_OUT, &[])?;
        delay.delay_ms(120);
        self.sleeping = false;
        Ok(())
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Stream `pixels` (RGB565, row-major) into the window at `(x, y)`.
    ///
    /// The window must lie on the panel; one that does not is skipped with a
    /// warning since the controller would otherwise wrap the excess.
    pub fn write_area<P>(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: P,
    ) -> Result<(), I::Error>
    where
        P: IntoIterator<Item = u16>,
    {
        if !self.window_fits(x, y, width, height) {
            return Ok(());
        }
        self.set_window(x, y, width, height)?;

        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        let mut len = 0;
        for pixel in pixels
            .into_iter()
            .take(usize::from(width) * usize::from(height))
        {
            chunk[len..len + 2].copy_from_slice(&pixel.to_be_bytes());
            len += 2;
            if len == chunk.len() {
                self.interface.send_data(&chunk)?;
                len = 0;
            }
        }
        if len > 0 {
            self.interface.send_data(&chunk[..len])?;
        }
        Ok(())
    }

    /// Fill a window with a single RGB565 colour
    pub fn fill_area(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        color: u16,
    ) -> Result<(), I::Error> {
        let count = usize::from(width) * usize::from(height);
        self.write_area(x, y, width, height, core::iter::repeat(color).take(count))
    }

    /// Fill the whole panel
    pub fn fill_screen(&mut self, color: u16) -> Result<(), I::Error> {
        let dims = self.config.rotated_dimensions();
        self.fill_area(0, 0, dims.cols, dims.rows, color)
    }

    /// Dimensions after rotation
    pub fn dimensions(&self) -> Dimensions {
        self.config.rotated_dimensions()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give the interface back
    pub fn release(self) -> I {
        self.interface
    }

    fn window_fits(&self, x: u16, y: u16, width: u16, height: u16) -> bool {
        let dims = self.config.rotated_dimensions();
        let fits = width > 0
            && height > 0
            && u32::from(x) + u32::from(width) <= u32::from(dims.cols)
            && u32::from(y) + u32::from(height) <= u32::from(dims.rows);
        if !fits && width > 0 && height > 0 {
            log::warn!("st7735: window {width}x{height} at ({x}, {y}) is off the panel");
        }
        fits
    }

    /// Set the column/row address window and open a memory write.
    fn set_window(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<(), I::Error> {
        let (col_offset, row_offset) = self.config.rotated_offsets();
        let x0 = x + col_offset;
        let x1 = x0 + width - 1;
        let y0 = y + row_offset;
        let y1 = y0 + height - 1;

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        self.command(COLUMN_ADDRESS_SET, &[x0h, x0l, x1h, x1l])?;

        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(ROW_ADDRESS_SET, &[y0h, y0l, y1h, y1l])?;

        self.interface.send_command(MEMORY_WRITE)
    }

    fn command(&mut self, command: u8, data: &[u8]) -> Result<(), I::Error> {
        self.interface.send_command(command)?;
        if !data.is_empty() {
            self.interface.send_data(data)?;
        }
        Ok(())
    }
}
