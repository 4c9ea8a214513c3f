//! Object detection screen. Not implemented on the device yet.

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    prelude::*,
    text::{Alignment, Text},
};

use crate::input::Button;
use crate::mode::Mode;
use crate::ui::theme::{layout, ui_font_body, ui_font_small};
use crate::ui::{palette, Activity, Context, Header};

#[derive(Debug)]
pub struct PlaceholderActivity {
    mode: Mode,
}

impl PlaceholderActivity {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

impl<D: DrawTarget<Color = Rgb565>> Activity<D> for PlaceholderActivity {
    fn enter(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        let display = &mut *ctx.display;
        display.clear(palette::BACKGROUND)?;
        Header::new(self.mode.label()).render(display)?;
        let center_x = display.bounding_box().center().x;
        Text::with_alignment(
            "Coming soon",
            Point::new(center_x, 80),
            MonoTextStyle::new(ui_font_body(), palette::WARNING),
            Alignment::Center,
        )
        .draw(display)?;
        Text::with_alignment(
            "BACK: return",
            Point::new(center_x, layout::FOOTER_TEXT_Y),
            MonoTextStyle::new(ui_font_small(), palette::MUTED),
            Alignment::Center,
        )
        .draw(display)?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_, D>) -> Result<(), D::Error> {
        if ctx.input.pressed(Button::Back) {
            ctx.request_transition(self.mode.parent());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ActivityRig;

    #[test]
    fn only_back_leaves() {
        let mut rig = ActivityRig::new();
        let mut screen = PlaceholderActivity::new(Mode::ObjectDetection);
        assert_eq!(rig.enter(&mut screen), None);
        assert!(rig.display.count_color(palette::WARNING) > 0);
        assert_eq!(rig.press(&mut screen, Button::Select), None);
        assert_eq!(rig.press(&mut screen, Button::Up), None);
        assert_eq!(rig.press(&mut screen, Button::Back), Some(Mode::Menu));
    }
}
