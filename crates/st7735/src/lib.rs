//! Driver for the Sitronix ST7735 TFT controller (RGB565, up to 132x162).
//!
//! - [`Interface`] owns the SPI device plus the DC and RST pins.
//! - [`Builder`] produces the [`Config`]: panel size, rotation, colour
//!   order, glass offset and inversion.
//! - [`Display`] runs the init sequence and streams pixels into address
//!   windows. With the `graphics` feature (default) it is an
//!   embedded-graphics `DrawTarget<Color = Rgb565>`.
//!
//! ```rust,ignore
//! use st7735::{Builder, Dimensions, Display, Interface, Rotation};
//!
//! let config = Builder::new()
//!     .dimensions(Dimensions::new(160, 128)?)
//!     .rotation(Rotation::Rotate0)
//!     .build()?;
//! let mut display = Display::new(Interface::new(spi, dc, rst), config);
//! display.init(&mut delay)?;
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod command;
pub mod config;
pub mod display;
pub mod error;
#[cfg(feature = "graphics")]
pub mod graphics;
pub mod interface;

pub use config::{Builder, ColorOrder, Config, Dimensions, Rotation};
pub use display::Display;
pub use error::{BuilderError, Error};
pub use interface::{DisplayInterface, Interface};
