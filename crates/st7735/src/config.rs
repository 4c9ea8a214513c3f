//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_COLS, MAX_ROWS};

use crate::command::{MADCTL_BGR, MADCTL_MV, MADCTL_MX, MADCTL_MY};

/// Panel dimensions in the native (portrait) orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of rows (height in pixels)
    pub rows: u16,
    /// Number of columns (width in pixels)
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if either side is zero or
    /// larger than the controller's frame memory.
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_ROWS || cols == 0 || cols > MAX_COLS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Bytes in one full RGB565 frame
    pub fn frame_bytes(&self) -> usize {
        self.rows as usize * self.cols as usize * 2
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    /// Whether rows and columns swap places
    pub fn is_landscape(self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }
}

/// Order of the colour filters on the glass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Display configuration
///
/// Use [`Builder`] to create one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub dimensions: Dimensions,
    pub rotation: Rotation,
    pub color_order: ColorOrder,
    /// First visible column in frame memory
    pub col_offset: u16,
    /// First visible row in frame memory
    pub row_offset: u16,
    /// Send INVON instead of INVOFF during init (IPS panels)
    pub inverted: bool,
}

impl Config {
    /// Dimensions as seen by drawing code, after rotation
    pub fn rotated_dimensions(&self) -> Dimensions {
        if self.rotation.is_landscape() {
            Dimensions {
                rows: self.dimensions.cols,
                cols: self.dimensions.rows,
            }
        } else {
            self.dimensions
        }
    }

    /// (column, row) offsets in the rotated address space
    pub fn rotated_offsets(&self) -> (u16, u16) {
        if self.rotation.is_landscape() {
            (self.row_offset, self.col_offset)
        } else {
            (self.col_offset, self.row_offset)
        }
    }

    /// MADCTL byte for this rotation and colour order
    pub fn madctl(&self) -> u8 {
        let rotation = match self.rotation {
            Rotation::Rotate0 => 0,
            Rotation::Rotate90 => MADCTL_MX | MADCTL_MV,
            Rotation::Rotate180 => MADCTL_MX | MADCTL_MY,
            Rotation::Rotate270 => MADCTL_MY | MADCTL_MV,
        };
        match self.color_order {
            ColorOrder::Rgb => rotation,
            ColorOrder::Bgr => rotation | MADCTL_BGR,
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use st7735::{Builder, ColorOrder, Dimensions, Rotation};
///
/// let config = Builder::new()
///     .dimensions(Dimensions::new(160, 128).unwrap())
///     .rotation(Rotation::Rotate0)
///     .color_order(ColorOrder::Bgr)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.rotated_dimensions().cols, 128);
/// ```
#[derive(Default)]
pub struct Builder {
    dimensions: Option<Dimensions>,
    rotation: Rotation,
    color_order: ColorOrder,
    col_offset: u16,
    row_offset: u16,
    inverted: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn color_order(mut self, order: ColorOrder) -> Self {
        self.color_order = order;
        self
    }

    /// Offset of the glass inside frame memory, in native orientation.
    /// Green-tab 128x128 modules, for instance, start at (2, 3).
    pub fn offset(mut self, col: u16, row: u16) -> Self {
        self.col_offset = col;
        self.row_offset = row;
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set,
    /// and `BuilderError::InvalidOffset` if the offset pushes the panel past
    /// the end of frame memory.
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        if dimensions.cols + self.col_offset > MAX_COLS
            || dimensions.rows + self.row_offset > MAX_ROWS
        {
            return Err(BuilderError::InvalidOffset {
                col: self.col_offset,
                row: self.row_offset,
            });
        }
        Ok(Config {
            dimensions,
            rotation: self.rotation,
            color_order: self.color_order,
            col_offset: self.col_offset,
            row_offset: self.row_offset,
            inverted: self.inverted,
        })
    }
}
