//! Hardware interface abstraction
//!
//! The ST7735 needs a write-only SPI bus (MOSI + SCK, CS handled by the
//! [`SpiDevice`]) and two GPIO outputs:
//! - **DC**: Data/Command select (low = command, high = data)
//! - **RST**: Reset (active low)
//!
//! ```rust,ignore
//! use st7735::{DisplayInterface, Interface};
//!
//! let mut interface = Interface::new(spi_device, dc_pin, rst_pin);
//! interface.reset(&mut delay)?;
//! interface.send_command(0x11)?; // Sleep out
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::error::Error;

/// Trait for hardware interface to the ST7735 controller
///
/// For most boards the provided [`Interface`] is enough. Implement this on
/// your own type for, say, a parallel bus or a shared DC line.
pub trait DisplayInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Send a command byte with DC low
    fn send_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send data bytes with DC high
    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Pulse RST low. The controller needs 10 µs low and up to 120 ms to
    /// come back, so implementations should wait at least that long.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;
}

/// [`DisplayInterface`] over embedded-hal v1.0 SPI and GPIO traits
pub struct Interface<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
}

impl<SPI, DC, RST> Interface<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
        Self { spi, dc, rst }
    }

    /// Give the bus and pins back
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }
}

impl<SPI, DC, RST, PinErr> DisplayInterface for Interface<SPI, DC, RST>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = Error<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(Error::Pin)?;
        self.spi.write(&[command]).map_err(Error::Spi)
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(Error::Pin)?;
        self.spi.write(data).map_err(Error::Spi)
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        self.rst.set_high().map_err(Error::Pin)?;
        delay.delay_ms(10);
        self.rst.set_low().map_err(Error::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(Error::Pin)?;
        delay.delay_ms(120);
        Ok(())
    }
}
