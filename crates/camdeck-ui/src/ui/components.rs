//! Reusable screen pieces for the colour panel.

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, LineHeight, Text},
};
use embedded_text::{alignment::HorizontalAlignment, style::TextBoxStyleBuilder, TextBox};

use crate::ui::theme::{layout, palette, ui_font_body, ui_font_small, ui_font_title};

/// Title bar with a separator underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub title: &'a str,
    pub color: Rgb565,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            color: palette::ACCENT,
        }
    }

    pub fn color(mut self, color: Rgb565) -> Self {
        self.color = color;
        self
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let width = display.bounding_box().size.width;
        Rectangle::new(Point::zero(), Size::new(width, layout::HEADER_H as u32))
            .into_styled(PrimitiveStyle::with_fill(palette::BACKGROUND))
            .draw(display)?;
        Text::new(
            self.title,
            Point::new(layout::MARGIN, layout::HEADER_TEXT_Y),
            MonoTextStyle::new(ui_font_body(), self.color),
        )
        .draw(display)?;
        Line::new(
            Point::new(layout::MARGIN, layout::HEADER_SEP_Y),
            Point::new(width as i32 - layout::MARGIN, layout::HEADER_SEP_Y),
        )
        .into_styled(PrimitiveStyle::with_stroke(self.color, 1))
        .draw(display)?;
        Ok(())
    }
}

/// Full-screen message: large title with optional detail lines below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Banner<'a> {
    pub title: &'a str,
    pub detail: Option<&'a str>,
    pub color: Rgb565,
}

impl<'a> Banner<'a> {
    pub fn new(title: &'a str, color: Rgb565) -> Self {
        Self {
            title,
            detail: None,
            color,
        }
    }

    pub fn detail(mut self, detail: &'a str) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        display.clear(palette::BACKGROUND)?;
        let bounds = display.bounding_box();
        let center_x = bounds.center().x;

        // Titles wider than the panel drop to the body font.
        let title_font = fit_font(self.title, bounds.size.width);
        Text::with_alignment(
            self.title,
            Point::new(center_x, 60),
            MonoTextStyle::new(title_font, self.color),
            Alignment::Center,
        )
        .draw(display)?;

        if let Some(detail) = self.detail {
            draw_wrapped(
                display,
                detail,
                Rectangle::new(
                    Point::new(layout::MARGIN, 80),
                    Size::new(bounds.size.width - 2 * layout::MARGIN as u32, 70),
                ),
                palette::TEXT,
            )?;
        }
        Ok(())
    }
}

fn fit_font(text: &str, width: u32) -> &'static MonoFont<'static> {
    let title = ui_font_title();
    if text.len() as u32 * title.character_size.width <= width {
        title
    } else {
        ui_font_body()
    }
}

/// One labelled key in a [`ButtonBar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarKey<'a> {
    pub label: &'a str,
    pub fill: Rgb565,
    pub text: Rgb565,
}

impl<'a> BarKey<'a> {
    pub const fn new(label: &'a str, fill: Rgb565) -> Self {
        Self {
            label,
            fill,
            text: palette::TEXT,
        }
    }

    pub const fn text(mut self, text: Rgb565) -> Self {
        self.text = text;
        self
    }
}

/// Two soft keys drawn in the strip at the bottom of the camera screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonBar<'a> {
    pub left: BarKey<'a>,
    pub right: BarKey<'a>,
}

impl<'a> ButtonBar<'a> {
    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let width = display.bounding_box().size.width;
        Rectangle::new(
            Point::new(0, layout::BUTTON_BAR_Y),
            Size::new(width, layout::BUTTON_BAR_H),
        )
        .into_styled(PrimitiveStyle::with_fill(palette::BACKGROUND))
        .draw(display)?;

        let key_w = 50u32;
        let right_x = width as i32 - key_w as i32 - layout::MARGIN;
        self.render_key(display, &self.left, layout::MARGIN, key_w)?;
        self.render_key(display, &self.right, right_x, key_w)?;
        Ok(())
    }

    fn render_key<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        key: &BarKey<'_>,
        x: i32,
        w: u32,
    ) -> Result<(), D::Error> {
        let rect = Rectangle::new(Point::new(x, layout::BUTTON_BAR_Y + 2), Size::new(w, 16));
        rect.into_styled(PrimitiveStyle::with_fill(key.fill))
            .draw(display)?;
        Text::with_text_style(
            key.label,
            rect.center(),
            MonoTextStyle::new(ui_font_small(), key.text),
            embedded_graphics::text::TextStyleBuilder::new()
                .alignment(Alignment::Center)
                .baseline(Baseline::Middle)
                .build(),
        )
        .draw(display)?;
        Ok(())
    }
}

/// Draw `text` word-wrapped inside `area` using the small font.
///
/// Rows that do not fit in `area` are dropped. Returns the text that was
/// left undrawn.
pub fn draw_wrapped<'t, D: DrawTarget<Color = Rgb565>>(
    display: &mut D,
    text: &'t str,
    area: Rectangle,
    color: Rgb565,
) -> Result<&'t str, D::Error> {
    let character_style = MonoTextStyle::new(ui_font_small(), color);
    let textbox_style = TextBoxStyleBuilder::new()
        .alignment(HorizontalAlignment::Left)
        .line_height(LineHeight::Pixels(ui_font_small().character_size.height + 2))
        .build();
    TextBox::with_textbox_style(text.trim(), area, character_style, textbox_style).draw(display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_display::TestDisplay;

    fn area() -> Rectangle {
        Rectangle::new(Point::new(4, 20), Size::new(120, 40))
    }

    #[test]
    fn wrapped_text_stays_inside_area() {
        let mut display = TestDisplay::new(128, 160);
        draw_wrapped(
            &mut display,
            "the quick brown fox jumps over the lazy dog",
            area(),
            palette::TEXT,
        )
        .unwrap();

        assert!(display.count_color(palette::TEXT) > 0);
        for y in 0..160 {
            for x in 0..128 {
                if display.pixel(x, y) == Some(palette::TEXT) {
                    assert!(area().contains(Point::new(x as i32, y as i32)));
                }
            }
        }
    }

    #[test]
    fn overflowing_text_is_returned() {
        let mut display = TestDisplay::new(128, 160);
        let long = "word ".repeat(200);
        let rest = draw_wrapped(&mut display, &long, area(), palette::TEXT).unwrap();
        assert!(!rest.is_empty());
        assert!(rest.len() < long.len());
    }

    #[test]
    fn blank_text_draws_nothing() {
        let mut display = TestDisplay::new(128, 160);
        draw_wrapped(&mut display, "   ", area(), palette::TEXT).unwrap();
        assert_eq!(display.count_color(palette::TEXT), 0);
    }
}
