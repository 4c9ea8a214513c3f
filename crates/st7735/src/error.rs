//! Error types for the driver
//!
//! - [`BuilderError`] is returned while assembling a [`Config`](crate::config::Config).
//! - [`Error`] is returned by [`Interface`](crate::interface::Interface) when SPI or a
//!   GPIO pin fails.
//!
//! ```
//! use st7735::{Builder, BuilderError, Dimensions};
//!
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Larger than the controller's frame memory
//! assert!(Dimensions::new(200, 128).is_err());
//! ```

use core::fmt::Debug;

/// Row count of the ST7735 frame memory (ST7735S: 162 lines)
pub const MAX_ROWS: u16 = 162;

/// Column count of the ST7735 frame memory (ST7735S: 132 sources)
pub const MAX_COLS: u16 = 132;

/// Errors raised while talking to the controller
#[derive(Debug)]
pub enum Error<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error (DC or RST)
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for Error<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Spi(e) => write!(f, "SPI error: {e:?}"),
            Error::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<SpiErr: Debug, PinErr: Debug> std::error::Error for Error<SpiErr, PinErr> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) was never called
    MissingDimensions,
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for the limits
    InvalidDimensions { rows: u16, cols: u16 },
    /// Offsets push the visible area outside frame memory
    InvalidOffset { col: u16, row: u16 },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuilderError::MissingDimensions => write!(f, "Dimensions must be specified"),
            BuilderError::InvalidDimensions { rows, cols } => write!(
                f,
                "Invalid dimensions {rows}x{cols} (max {MAX_ROWS}x{MAX_COLS})"
            ),
            BuilderError::InvalidOffset { col, row } => {
                write!(f, "Offset ({col}, {row}) does not fit in frame memory")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuilderError {}
