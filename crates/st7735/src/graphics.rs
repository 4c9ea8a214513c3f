//! embedded-graphics support
//!
//! [`Display`] is a [`DrawTarget`] for [`Rgb565`]. There is no frame buffer:
//! every draw call turns into one or more address windows streamed straight
//! to the controller, so prefer filled primitives and whole images over
//! scattered pixels.
//!
//! ```rust,ignore
//! use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::*};
//!
//! display.clear(Rgb565::BLACK)?;
//! Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
//!     .draw(&mut display)?;
//! ```

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::{IntoStorage, Rgb565},
    primitives::{PointsIter, Rectangle},
    Pixel,
};

use crate::display::Display;
use crate::interface::DisplayInterface;

impl<I> DrawTarget for Display<I>
where
    I: DisplayInterface,
{
    type Color = Rgb565;
    type Error = I::Error;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let size = self.size();
        for Pixel(Point { x, y }, color) in pixels {
            if x >= 0 && y >= 0 && (x as u32) < size.width && (y as u32) < size.height {
                self.write_area(
                    x as u16,
                    y as u16,
                    1,
                    1,
                    core::iter::once(color.into_storage()),
                )?;
            }
        }
        Ok(())
    }

    fn fill_contiguous<Iter>(&mut self, area: &Rectangle, colors: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Self::Color>,
    {
        let drawable = area.intersection(&self.bounding_box());
        let Some((x, y, width, height)) = window(&drawable) else {
            return Ok(());
        };

        let colors = colors.into_iter().map(IntoStorage::into_storage);
        if drawable == *area {
            return self.write_area(x, y, width, height, colors);
        }
        // Partly off-screen: keep the row-major order, drop clipped points.
        let visible = area
            .points()
            .zip(colors)
            .filter(|(point, _)| contains(&drawable, *point))
            .map(|(_, color)| color);
        self.write_area(x, y, width, height, visible)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let drawable = area.intersection(&self.bounding_box());
        match window(&drawable) {
            Some((x, y, width, height)) => {
                self.fill_area(x, y, width, height, color.into_storage())
            }
            None => Ok(()),
        }
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_screen(color.into_storage())
    }
}

impl<I> OriginDimensions for Display<I>
where
    I: DisplayInterface,
{
    fn size(&self) -> Size {
        let dims = self.dimensions();
        Size::new(u32::from(dims.cols), u32::from(dims.rows))
    }
}

/// On-panel rectangle as `(x, y, width, height)`, `None` when empty.
fn window(rect: &Rectangle) -> Option<(u16, u16, u16, u16)> {
    if rect.size.width == 0 || rect.size.height == 0 {
        return None;
    }
    Some((
        u16::try_from(rect.top_left.x).ok()?,
        u16::try_from(rect.top_left.y).ok()?,
        u16::try_from(rect.size.width).ok()?,
        u16::try_from(rect.size.height).ok()?,
    ))
}

fn contains(rect: &Rectangle, point: Point) -> bool {
    let Point { x, y } = point - rect.top_left;
    x >= 0 && y >= 0 && (x as u32) < rect.size.width && (y as u32) < rect.size.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{COLUMN_ADDRESS_SET, MEMORY_WRITE, ROW_ADDRESS_SET};
    use crate::config::Builder;
    use crate::interface::mock::{interface, Log, MockInterface};

    fn display() -> (Display<MockInterface>, Log) {
        let (interface, _, log) = interface();
        let config = Builder::new()
            .dimensions(crate::Dimensions::new(160, 128).unwrap())
            .build()
            .unwrap();
        (Display::new(interface, config), log)
    }

    #[test]
    fn reports_panel_size() {
        let (display, _) = display();
        assert_eq!(display.size(), Size::new(128, 160));
    }

    #[test]
    fn pixels_off_panel_are_ignored() {
        let (mut display, log) = display();
        display
            .draw_iter([
                Pixel(Point::new(-1, 0), Rgb565::new(31, 0, 0)),
                Pixel(Point::new(128, 0), Rgb565::new(31, 0, 0)),
                Pixel(Point::new(5, 6), Rgb565::new(0, 0, 31)),
            ])
            .unwrap();
        assert_eq!(log.data_after(COLUMN_ADDRESS_SET), [0, 5, 0, 5]);
        assert_eq!(log.data_after(MEMORY_WRITE), [0x00, 0x1F]);
    }

    #[test]
    fn solid_fill_is_clipped_to_the_panel() {
        let (mut display, log) = display();
        let area = Rectangle::new(Point::new(120, 150), Size::new(20, 20));
        display.fill_solid(&area, Rgb565::new(31, 63, 31)).unwrap();
        assert_eq!(log.data_after(COLUMN_ADDRESS_SET), [0, 120, 0, 127]);
        assert_eq!(log.data_after(ROW_ADDRESS_SET), [0, 150, 0, 159]);
        assert_eq!(log.data_after(MEMORY_WRITE).len(), 8 * 10 * 2);
    }

    #[test]
    fn contiguous_fill_drops_clipped_points_in_order() {
        let (mut display, log) = display();
        // 3x2 area, left column off-screen.
        let area = Rectangle::new(Point::new(-1, 0), Size::new(3, 2));
        let colors = (0..6u8).map(|i| Rgb565::new(0, 0, i));
        display.fill_contiguous(&area, colors).unwrap();
        assert_eq!(
            log.data_after(MEMORY_WRITE),
            [0x00, 0x01, 0x00, 0x02, 0x00, 0x04, 0x00, 0x05]
        );
    }

    #[test]
    fn fully_hidden_area_sends_nothing() {
        let (mut display, log) = display();
        let area = Rectangle::new(Point::new(200, 0), Size::new(5, 5));
        display.fill_solid(&area, Rgb565::new(1, 1, 1)).unwrap();
        assert!(log.events().is_empty());
    }
}
